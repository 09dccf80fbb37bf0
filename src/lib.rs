#![doc = include_str!("../README.md")]

pub mod aggregate;
pub mod cdp;

#[cfg(test)]
pub mod test_support;
