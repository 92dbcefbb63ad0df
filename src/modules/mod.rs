// Built-in command modules and the manifest-backed external ones.
//
// Each built-in module exposes `register(&mut ModuleSource)`; adding a
// module means adding one line to `builtin_source`.

pub mod auth;
pub mod external;
pub mod rest;
pub mod utility;

use crate::command::ModuleSource;

/// The modules compiled into the binary.
pub fn builtin_source() -> ModuleSource {
    let mut source = ModuleSource::new("builtin");
    utility::register(&mut source);
    auth::register(&mut source);
    rest::register(&mut source);
    source
}
