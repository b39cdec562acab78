//! Constructors for the ESRGAN discriminator: a strided convolutional
//! encoder, a stack of linear layers, and the VGG-style network that joins
//! them through a pooling layer.
//!
//! Construction produces a layer plan rather than weights. Each layer names
//! the factory target that would create it.

use std::any::Any;

use serde_json::json;
use tracing::warn;

use crate::constants::{discriminator, targets};
use crate::graph::{BoundArguments, Instance, Object, Registry, Signature, Value};

/// One layer inside a block, created by the factory target `factory`
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
	pub name: String,
	pub factory: String,
	pub in_channels: i64,
	pub out_channels: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConvBlock {
	pub name: String,
	pub in_channels: i64,
	pub out_channels: i64,
	pub stride: i64,
	pub layers: Vec<LayerSpec>,
	pub residual: Option<String>,
}

#[derive(Debug)]
pub struct StridedConvEncoder {
	layers: Vec<i64>,
	blocks: Vec<ConvBlock>,
}

impl StridedConvEncoder {
	pub fn in_channels(&self) -> i64 {
		self.layers[0]
	}

	pub fn out_channels(&self) -> i64 {
		self.layers[self.layers.len() - 1]
	}

	pub fn blocks(&self) -> &[ConvBlock] {
		&self.blocks
	}

	fn from_args(args: &BoundArguments) -> Result<Self, String> {
		let layers = args.int_list("layers")?;
		if layers.len() < 2 {
			return Err(format!(
				"'layers' needs at least two feature map sizes, got {}",
				layers.len()
			));
		}
		if let Some(bad) = layers.iter().find(|&&size| size <= 0) {
			return Err(format!("feature map sizes must be positive, got {}", bad));
		}
		if let Some(pair) = layers[1..].windows(2).find(|pair| pair[1] < pair[0]) {
			return Err(format!(
				"feature map sizes must not shrink, got {} after {}",
				pair[1], pair[0]
			));
		}

		let layer_order = args.str_list("layer_order")?;
		for name in &layer_order {
			if !matches!(name.as_str(), "conv" | "norm" | "activation") {
				return Err(format!("unknown layer '{}' in layer_order", name));
			}
		}

		let conv = factory(args, "conv")?.ok_or("'conv' factory must not be null")?;
		let activation = factory(args, "activation")?.ok_or("'activation' factory must not be null")?;
		let norm = factory(args, "norm")?;
		let residual = factory(args, "residual")?;

		let mut blocks = vec![ConvBlock {
			name: "block_0".to_string(),
			in_channels: layers[0],
			out_channels: layers[1],
			stride: 1,
			layers: vec![
				layer("conv_0", &conv, layers[0], layers[1]),
				layer("act", &activation, layers[1], layers[1]),
			],
			residual: None,
		}];

		for (index, pair) in layers[1..].windows(2).enumerate() {
			let (in_ch, out_ch) = (pair[0], pair[1]);
			let mut block_layers = Vec::with_capacity(layer_order.len());
			for name in &layer_order {
				let chosen = match name.as_str() {
					"conv" => Some(&conv),
					"norm" => norm.as_ref(),
					_ => Some(&activation),
				};
				// a null factory drops the layer from the block
				if let Some(target) = chosen {
					block_layers.push(layer(name, target, in_ch, out_ch));
				}
			}
			blocks.push(ConvBlock {
				name: format!("block_{}", index + 1),
				in_channels: in_ch,
				out_channels: out_ch,
				// conv followed by 2x2 pooling is the same as a stride-2 conv
				stride: out_ch / in_ch,
				layers: block_layers,
				residual: residual.clone().filter(|_| in_ch == out_ch),
			});
		}

		Ok(StridedConvEncoder { layers, blocks })
	}
}

impl Instance for StridedConvEncoder {
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn to_json(&self) -> serde_json::Value {
		json!({
			"in_channels": self.in_channels(),
			"out_channels": self.out_channels(),
			"blocks": self.blocks.iter().map(block_json).collect::<Vec<_>>(),
		})
	}
}

#[derive(Debug)]
pub struct LinearHead {
	in_channels: i64,
	out_channels: i64,
	layers: Vec<LayerSpec>,
}

impl LinearHead {
	pub fn in_channels(&self) -> i64 {
		self.in_channels
	}

	pub fn out_channels(&self) -> i64 {
		self.out_channels
	}

	pub fn layers(&self) -> &[LayerSpec] {
		&self.layers
	}

	fn from_args(args: &BoundArguments) -> Result<Self, String> {
		let in_channels = args.int("in_channels")?;
		let out_channels = args.int("out_channels")?;
		let latent = if args.value("latent_channels")?.is_null() {
			Vec::new()
		} else {
			args.int_list("latent_channels")?
		};

		let layer_order = args.str_list("layer_order")?;
		for name in &layer_order {
			if !matches!(name.as_str(), "linear" | "activation" | "norm" | "dropout") {
				return Err(format!("unknown layer '{}' in layer_order", name));
			}
		}

		let linear = factory(args, "linear")?.ok_or("'linear' factory must not be null")?;
		let by_name = |name: &str| -> Result<Option<String>, String> {
			match name {
				"linear" => Ok(Some(linear.clone())),
				other => factory(args, other),
			}
		};

		let mut channels = Vec::with_capacity(latent.len() + 2);
		channels.push(in_channels);
		channels.extend(latent);
		channels.push(out_channels);
		if let Some(bad) = channels.iter().find(|&&size| size <= 0) {
			return Err(format!("channel sizes must be positive, got {}", bad));
		}

		let pairs: Vec<(i64, i64)> = channels.windows(2).map(|pair| (pair[0], pair[1])).collect();
		let mut layers = Vec::new();
		for &(in_ch, out_ch) in &pairs[..pairs.len() - 1] {
			for name in &layer_order {
				if let Some(target) = by_name(name.as_str())? {
					layers.push(layer(name, &target, in_ch, out_ch));
				}
			}
		}
		let (last_in, last_out) = pairs[pairs.len() - 1];
		layers.push(layer("linear", &linear, last_in, last_out));

		Ok(LinearHead {
			in_channels,
			out_channels,
			layers,
		})
	}
}

impl Instance for LinearHead {
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn to_json(&self) -> serde_json::Value {
		json!({
			"in_channels": self.in_channels,
			"out_channels": self.out_channels,
			"layers": self.layers.iter().map(layer_json).collect::<Vec<_>>(),
		})
	}
}

#[derive(Debug)]
pub struct VGGConv {
	pub encoder: Object,
	pub pool: Object,
	pub head: Object,
}

impl VGGConv {
	fn from_args(args: &BoundArguments) -> Result<Self, String> {
		let encoder = args.object("encoder")?;
		let pool = args.object("pool")?;
		let head = args.object("head")?;

		let encoder_out = encoder.downcast_ref::<StridedConvEncoder>().map(StridedConvEncoder::out_channels);
		let head_in = head.downcast_ref::<LinearHead>().map(LinearHead::in_channels);
		if let (Some(encoder_out), Some(head_in)) = (encoder_out, head_in) {
			if encoder_out != head_in {
				warn!(encoder_out, head_in, "encoder output channels do not match head input channels");
			}
		}

		Ok(VGGConv { encoder, pool, head })
	}
}

impl Instance for VGGConv {
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn to_json(&self) -> serde_json::Value {
		json!({
			"encoder": self.encoder.to_json(),
			"pool": self.pool.to_json(),
			"head": self.head.to_json(),
		})
	}
}

/// Reads a layer factory argument: a partial, a target name, or null
fn factory(args: &BoundArguments, name: &str) -> Result<Option<String>, String> {
	match args.value(name)? {
		Value::Null => Ok(None),
		Value::Str(target) => Ok(Some(target.clone())),
		Value::Partial(partial) => Ok(Some(partial.target().to_string())),
		other => Err(format!(
			"'{}' must be a layer factory (partial or target name), found a {}",
			name,
			other.type_name()
		)),
	}
}

fn layer(name: &str, factory: &str, in_channels: i64, out_channels: i64) -> LayerSpec {
	LayerSpec {
		name: name.to_string(),
		factory: factory.to_string(),
		in_channels,
		out_channels,
	}
}

fn layer_json(layer: &LayerSpec) -> serde_json::Value {
	json!({
		"name": layer.name,
		"factory": layer.factory,
		"in_channels": layer.in_channels,
		"out_channels": layer.out_channels,
	})
}

fn block_json(block: &ConvBlock) -> serde_json::Value {
	json!({
		"name": block.name,
		"in_channels": block.in_channels,
		"out_channels": block.out_channels,
		"stride": block.stride,
		"residual": block.residual,
		"layers": block.layers.iter().map(layer_json).collect::<Vec<_>>(),
	})
}

fn str_list(items: &[&str]) -> Value {
	Value::List(items.iter().map(|&item| Value::from(item)).collect())
}

pub fn register(registry: &mut Registry) {
	registry.register(
		targets::STRIDED_CONV_ENCODER,
		Signature::new()
			.optional("layers", discriminator::DEFAULT_ENCODER_LAYERS.to_vec())
			.optional("layer_order", str_list(discriminator::DEFAULT_ENCODER_LAYER_ORDER))
			.optional("conv", targets::CONV2D)
			.optional("norm", targets::BATCH_NORM2D)
			.optional("activation", targets::LEAKY_RELU)
			.optional("residual", Value::Null),
		|args| {
			StridedConvEncoder::from_args(&args)
				.map(|encoder| Value::Object(Object::new(targets::STRIDED_CONV_ENCODER, encoder)))
		},
	);

	registry.register(
		targets::LINEAR_HEAD,
		Signature::new()
			.required("in_channels")
			.required("out_channels")
			.optional("latent_channels", Value::Null)
			.optional("layer_order", str_list(discriminator::DEFAULT_HEAD_LAYER_ORDER))
			.optional("linear", targets::LINEAR)
			.optional("activation", targets::LEAKY_RELU)
			.optional("norm", Value::Null)
			.optional("dropout", Value::Null),
		|args| LinearHead::from_args(&args).map(|head| Value::Object(Object::new(targets::LINEAR_HEAD, head))),
	);

	registry.register(
		targets::VGG_CONV,
		Signature::new().required("encoder").required("pool").required("head"),
		|args| VGGConv::from_args(&args).map(|net| Value::Object(Object::new(targets::VGG_CONV, net))),
	);
}
