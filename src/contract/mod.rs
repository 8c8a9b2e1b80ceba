// Smart-contract boundary for the file registry
// The contract itself lives on chain; this module only encodes calls and decodes results

pub mod abi;
mod registry;

pub use registry::{FileRegistry, RpcFileRegistry};
