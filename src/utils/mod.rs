#[cfg(test)]
pub mod test_helpers;
