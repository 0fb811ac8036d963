pub mod beats;
pub mod casting;
pub mod context;
pub mod ending;
pub mod frame;
pub mod pipeline;
pub mod random;
pub mod render;
pub mod setting;
pub mod validate;
