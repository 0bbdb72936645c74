pub mod error;
pub mod executor;
pub mod forecast;
pub mod inputs;
pub mod noise;
pub mod plan;
pub mod record;
pub mod series;
pub mod settlement;
pub mod storage;
pub mod strategy;
pub mod system;
pub mod window;
