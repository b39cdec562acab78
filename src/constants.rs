pub mod keys {
	pub const TARGET: &str = "_target_";
	pub const PARTIAL: &str = "_partial_";
	pub const ARGS: &str = "_args_";
	pub const RECURSIVE: &str = "_recursive_";
	pub const MERGE: &str = "<<";
}

pub mod path {
	pub const ROOT: &str = "<root>";
	pub const SEPARATOR: char = '.';
}

pub mod targets {
	pub const STRIDED_CONV_ENCODER: &str = "esrgan.models.StridedConvEncoder";
	pub const LINEAR_HEAD: &str = "esrgan.models.LinearHead";
	pub const VGG_CONV: &str = "esrgan.models.VGGConv";

	pub const CONV2D: &str = "esrgan.nn.Conv2d";
	pub const LEAKY_RELU: &str = "esrgan.nn.LeakyReLU";
	pub const BATCH_NORM2D: &str = "torch.nn.BatchNorm2d";
	pub const ADAPTIVE_AVG_POOL2D: &str = "torch.nn.AdaptiveAvgPool2d";
	pub const LINEAR: &str = "torch.nn.Linear";
	pub const DROPOUT: &str = "torch.nn.Dropout";

	pub const LAYER_FACTORIES: &[&str] = &[CONV2D, LEAKY_RELU, BATCH_NORM2D, ADAPTIVE_AVG_POOL2D, LINEAR, DROPOUT];
}

pub mod discriminator {
	pub const DEFAULT_ENCODER_LAYERS: &[i64] = &[3, 64, 128, 128, 256, 256, 512, 512];
	pub const DEFAULT_ENCODER_LAYER_ORDER: &[&str] = &["conv", "norm", "activation"];
	pub const DEFAULT_HEAD_LAYER_ORDER: &[&str] = &["linear", "activation"];
}

pub mod file {
	pub const DEFAULT_SETTINGS_FILE: &str = "srgan_config.toml";
}
