//! Prints a fresh signing key ID and key, for seeding file-based key stores.

use anyhow::Result;
use rand::rngs::OsRng;

use signet_keystore::{random_hex, KEY_ID_LENGTH, KEY_LENGTH};

fn main() -> Result<()> {
    let id = random_hex(&mut OsRng, KEY_ID_LENGTH)?;
    let key = random_hex(&mut OsRng, KEY_LENGTH)?;

    println!("ID:  {id}");
    println!("Key: {key}");
    Ok(())
}
