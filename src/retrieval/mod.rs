pub mod case;
pub mod engine;
pub mod evaluate;
pub mod similarity;
