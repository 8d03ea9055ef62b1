/// The stock keyboard device.
pub mod keyboard;
/// The device arena and mapping log.
pub mod registry;
