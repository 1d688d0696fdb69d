pub mod functions;
pub mod memory;

pub use functions::FunctionsApiClient;
pub use memory::InMemoryCustomerApi;
