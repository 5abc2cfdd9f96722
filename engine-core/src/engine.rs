pub mod book;
pub mod engine;
pub mod error;
pub mod history;
pub mod market_price;
pub mod matcher;
pub mod order;
pub mod sink;
pub mod sweeper;
pub mod trader;
pub mod types;

pub mod prelude {
    pub use super::book::*;
    pub use super::engine::*;
    pub use super::error::*;
    pub use super::history::*;
    pub use super::market_price::*;
    pub use super::matcher::*;
    pub use super::order::*;
    pub use super::sink::*;
    pub use super::sweeper::*;
    pub use super::trader::*;
    pub use super::types::*;
}
