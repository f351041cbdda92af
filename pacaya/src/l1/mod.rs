pub mod execution_layer;
pub mod protocol_config;
pub mod protocol_state;
