pub mod execution_layer;
