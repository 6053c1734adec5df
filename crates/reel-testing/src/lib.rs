//! Testing utilities and harness for reel scenes.

pub mod timeline;

pub use timeline::*;

pub mod prelude {
    pub use crate::timeline::*;
}
