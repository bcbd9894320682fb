use alloy::{
    primitives::Address,
    providers::{Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};
use eyre::{Result, WrapErr};

pub fn signer_from_key(key: &str) -> Result<PrivateKeySigner> {
    key.trim()
        .parse::<PrivateKeySigner>()
        .wrap_err("PRIVATE_KEY is not a valid secp256k1 key")
}

/// Provider that signs and sends with `signer`.
pub async fn connect_wallet(
    rpc_url: &str,
    signer: PrivateKeySigner,
) -> Result<impl Provider + Clone + 'static> {
    let provider = ProviderBuilder::new()
        .wallet(signer)
        .connect(rpc_url)
        .await
        .wrap_err_with(|| format!("failed to connect to {rpc_url}"))?;
    Ok(provider)
}

pub async fn connect_read_only(rpc_url: &str) -> Result<impl Provider + Clone + 'static> {
    let provider = ProviderBuilder::new()
        .connect(rpc_url)
        .await
        .wrap_err_with(|| format!("failed to connect to {rpc_url}"))?;
    Ok(provider)
}

/// Account to read for: an explicit address wins over the signer's.
pub fn resolve_account(explicit: Option<Address>, key: Option<&str>) -> Result<Address> {
    if let Some(account) = explicit {
        return Ok(account);
    }
    let key = key.ok_or_else(|| eyre::eyre!("pass --account or set PRIVATE_KEY"))?;
    Ok(signer_from_key(key)?.address())
}
