pub mod quote;
pub mod rates;
pub mod refresh;
pub mod setup;
pub mod ui;
pub mod watch;
