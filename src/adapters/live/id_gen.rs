//! Live UUID factories backed by the `uuid` crate.

use std::sync::OnceLock;

use uuid::Uuid;

use crate::error::FreezeError;
use crate::identifier::Identifier;
use crate::ports::UuidFactory;

/// Live factory that produces random (version 4) UUIDs.
pub struct LiveUuid4;

impl LiveUuid4 {
    /// Creates a new live v4 factory.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for LiveUuid4 {
    fn default() -> Self {
        Self::new()
    }
}

impl UuidFactory for LiveUuid4 {
    fn generate(&self) -> Result<Identifier, FreezeError> {
        Ok(Uuid::new_v4().into())
    }

    fn name(&self) -> &str {
        "uuid4"
    }
}

/// Live factory that produces time-based (version 1) UUIDs.
///
/// The node id is drawn once per process from random bytes.
pub struct LiveUuid1;

impl LiveUuid1 {
    /// Creates a new live v1 factory.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn node_id() -> &'static [u8; 6] {
        static NODE: OnceLock<[u8; 6]> = OnceLock::new();
        NODE.get_or_init(|| {
            let bytes = Uuid::new_v4().into_bytes();
            let mut node = [0u8; 6];
            node.copy_from_slice(&bytes[10..]);
            // Multicast bit marks a node id that is not a real MAC address.
            node[0] |= 0x01;
            node
        })
    }
}

impl Default for LiveUuid1 {
    fn default() -> Self {
        Self::new()
    }
}

impl UuidFactory for LiveUuid1 {
    fn generate(&self) -> Result<Identifier, FreezeError> {
        Ok(Uuid::now_v1(Self::node_id()).into())
    }

    fn name(&self) -> &str {
        "uuid1"
    }
}
