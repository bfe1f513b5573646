//! Nested attribute packing shared by both sides of the gateway:
//! RADIUS Vendor-Specific attributes and Diameter grouped AVPs.

pub mod grouped;
pub mod vsa;

pub use grouped::{decode_grouped_avp, encode_grouped_avp, find_child, find_children};
pub use vsa::{decode_vendor_attribute, encode_vendor_attribute, VendorAttribute};
