pub mod logging;
pub mod rpc;
pub mod watchdog;
