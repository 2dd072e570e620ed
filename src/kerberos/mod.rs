pub mod ccache;
pub mod display;
pub mod env;

pub use env::default_cache_name;
