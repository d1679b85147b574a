//! Conversion from raw asset data strings to `Asset` records

use crate::{
    constants::KOVAN_TO_MAINNET_ASSET_DATA,
    types::{Asset, AssetMetaDataMap, Network},
};

/// Maps testnet asset data to the mainnet asset data meta data is keyed by
///
/// Returns `None` when the asset has no known mainnet counterpart.
pub fn mainnet_asset_data(asset_data: &str, network: Network) -> Option<String> {
    let asset_data = asset_data.to_lowercase();
    match network {
        Network::Mainnet => Some(asset_data),
        Network::Kovan => KOVAN_TO_MAINNET_ASSET_DATA
            .iter()
            .find(|(kovan, _)| *kovan == asset_data)
            .map(|(_, mainnet)| mainnet.to_string()),
    }
}

/// Builds an asset from its asset data if meta data exists for it
pub fn create_asset_if_exists(
    asset_data: &str,
    meta_data_map: &AssetMetaDataMap,
    network: Network,
) -> Option<Asset> {
    let key = mainnet_asset_data(asset_data, network)?;
    let meta_data = meta_data_map.get(&key)?;
    Some(Asset {
        asset_data: asset_data.to_lowercase(),
        meta_data: meta_data.clone(),
    })
}

/// Builds assets for every asset data that has meta data, preserving order
pub fn create_assets_from_asset_datas(
    asset_datas: &[String],
    meta_data_map: &AssetMetaDataMap,
    network: Network,
) -> Vec<Asset> {
    asset_datas
        .iter()
        .filter_map(|asset_data| {
            let asset = create_asset_if_exists(asset_data, meta_data_map, network);
            if asset.is_none() {
                tracing::debug!(asset_data = %asset_data, ?network, "No meta data for asset, skipping");
            }
            asset
        })
        .collect()
}
