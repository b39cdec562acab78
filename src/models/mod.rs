pub mod discriminator;

pub use self::discriminator::{ConvBlock, LayerSpec, LinearHead, StridedConvEncoder, VGGConv};

use crate::constants::targets;
use crate::graph::{Registry, Signature};

/// Registers the discriminator networks and the layer factories they refer to.
/// Layer factories accept any keyword arguments and record them.
pub fn register_builtins(registry: &mut Registry) {
	discriminator::register(registry);
	for name in targets::LAYER_FACTORIES {
		registry.register_component(name, Signature::variadic());
	}
}
