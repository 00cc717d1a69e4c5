//! Typed Go-target AST synthesis. Service interfaces,
//! service-impl structs/constructors, and repository ports are built as
//! [`ast`] trees and rendered by [`printer`] — never string-concatenated.

pub mod ast;
pub mod imports;
pub mod printer;
mod synth;

pub use imports::derive_imports;
pub use printer::{print_func, print_interface, print_struct};
pub use synth::{
    repository_port, service_impl_struct, service_interface, synthesize_method_body, MethodBody,
};
