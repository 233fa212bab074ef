//! Tagged action creators and creator registries.
//!
//! A creator pairs a fixed wire tag with a payload transform. A registry maps
//! short local keys to creators, deriving each tag as `namespace/key` (or the
//! bare key). Registries are built once, validated for tag uniqueness, and
//! read-only afterwards.
//!
//! The reducer side lives in `reduxframe-reducer`.

pub mod config;
pub mod creator;
pub mod error;
pub mod namespace;
pub mod registry;
pub mod types;

pub use config::{load_config, CollisionPolicy, RegistryConfig};
pub use creator::{action_creator, transform, try_transform, ActionCreator, Transform};
pub use error::{RegistryError, RegistryResult};
pub use namespace::Namespace;
pub use registry::{
    action_creators, action_creators_with_config, CreatorRegistry, CreatorRegistryBuilder,
    TransformMap,
};
pub use types::Action;
