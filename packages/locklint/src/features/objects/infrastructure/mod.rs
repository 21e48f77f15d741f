pub mod resolver;

pub use resolver::ObjectResolver;
