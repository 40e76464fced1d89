//! Backend HTTP adapter.
//!
//! One client implements every network port: chat status, text and image
//! exchanges, and the dashboard conversation list.
//! Uses browser `fetch()` via gloo-net for WASM compatibility.

use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use web_sys::FormData;

use ava_core::ports::*;
use ava_types::{
    Result, TransportError,
    api::{
        AssistantReply, ChatReplyBody, ConversationListBody, SendMessageRequest, ServiceStatus,
        StatusBody, upload_fields,
    },
    config::Endpoints,
    conversation::{ConversationPage, PageQuery},
};

use crate::upload::PickedFile;

pub struct HttpClient {
    endpoints: Endpoints,
}

impl HttpClient {
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Classify the status line, then read the body as text.
    /// A followed login redirect counts as a 302.
    async fn read_body(response: Response) -> Result<String> {
        if response.redirected()
            || response.status() == TransportError::LOGIN_REDIRECT
        {
            log::warn!("Request to {} was redirected to login", response.url());
            return Err(TransportError::login_redirect());
        }

        if !response.ok() {
            return Err(TransportError::Http {
                status: response.status(),
                status_text: response.status_text(),
            });
        }

        response.text().await.map_err(network)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let raw = Self::read_body(response).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    async fn read_reply(response: Response) -> Result<AssistantReply> {
        let raw = Self::read_body(response).await?;
        ChatReplyBody::parse(&raw)?.into_reply()
    }
}

#[async_trait(?Send)]
impl StatusPort for HttpClient {
    async fn check_status(&self) -> Result<ServiceStatus> {
        let response = Request::get(&self.endpoints.status())
            .send()
            .await
            .map_err(network)?;

        let body: StatusBody = Self::read_json(response).await?;
        Ok(ServiceStatus::from(body))
    }
}

#[async_trait(?Send)]
impl ChatTransport for HttpClient {
    type Upload = PickedFile;

    async fn send_text(
        &self,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<AssistantReply> {
        let body = SendMessageRequest {
            message: message.to_string(),
            conversation_id: conversation_id.map(String::from),
        };

        let response = Request::post(&self.endpoints.message())
            .json(&body)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;

        Self::read_reply(response).await
    }

    async fn send_image(&self, image: &PickedFile, prompt: &str) -> Result<AssistantReply> {
        let form = FormData::new().map_err(js_error)?;
        form.append_with_blob_and_filename(upload_fields::IMAGE, image.as_file(), &image.file_name())
            .map_err(js_error)?;
        form.append_with_str(upload_fields::MESSAGE, prompt)
            .map_err(js_error)?;
        form.append_with_str(upload_fields::UNLIMITED, "false")
            .map_err(js_error)?;

        // No explicit Content-Type: the browser sets the multipart boundary
        let response = Request::post(&self.endpoints.image_analysis())
            .body(form)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;

        Self::read_reply(response).await
    }
}

#[async_trait(?Send)]
impl ConversationSource for HttpClient {
    async fn list_conversations(&self, query: &PageQuery) -> Result<ConversationPage> {
        let pairs = query.query_pairs();
        let response = Request::get(&self.endpoints.conversations())
            .query(pairs.iter().map(|(key, value)| (*key, value.as_str())))
            .send()
            .await
            .map_err(network)?;

        let body: ConversationListBody = Self::read_json(response).await?;
        body.into_page(query.page)
    }
}

fn network(e: gloo_net::Error) -> TransportError {
    match e {
        gloo_net::Error::SerdeError(e) => TransportError::Parse(e.to_string()),
        other => TransportError::Network(other.to_string()),
    }
}

fn js_error(e: wasm_bindgen::JsValue) -> TransportError {
    TransportError::Network(format!("{:?}", e))
}
