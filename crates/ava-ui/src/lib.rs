pub mod markup;
pub mod thread;
pub mod views;

#[cfg(test)]
mod tests;
