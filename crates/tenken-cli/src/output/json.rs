use serde::Serialize;
use tenken_core::error::TenkenError;

pub fn print<T: Serialize>(value: &T) -> Result<(), TenkenError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
