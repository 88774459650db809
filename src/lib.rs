pub mod channel;
pub mod fec;
pub mod sim;
pub mod ui;
pub mod utils;
