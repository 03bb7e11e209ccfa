pub mod loader;
pub mod schema;

use crate::core::states::AppState;
use bevy::prelude::*;
use schema::UpgradeList;

// --------------------------- 资源 ---------------------------
#[derive(Resource, Default)]
pub struct UpgradeAssets {
    pub handle: Option<Handle<UpgradeList>>,
}

// --------------------------- 插件 ---------------------------
pub struct DataPlugin;
impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app
            // 注册资产类型 & Loader
            .init_asset::<UpgradeList>()
            .register_asset_loader(loader::RonUpgradeLoader::default())
            // 注册资源
            .init_resource::<UpgradeAssets>()
            // Loading 流程
            .add_systems(OnEnter(AppState::Loading), start_loading)
            .add_systems(Update, check_loaded.run_if(in_state(AppState::Loading)));
    }
}

// --------------------------- 系统 ---------------------------
fn start_loading(mut upgrade_assets: ResMut<UpgradeAssets>, asset_server: Res<AssetServer>) {
    let handle: Handle<UpgradeList> = asset_server.load("data/upgrades.ron");
    upgrade_assets.handle = Some(handle);
}

fn check_loaded(
    mut next: ResMut<NextState<AppState>>,
    upgrade_assets: Res<UpgradeAssets>,
    lists: Res<Assets<UpgradeList>>,
) {
    if let Some(h) = &upgrade_assets.handle {
        if let Some(list) = lists.get(h) {
            println!("✔ Upgrades loaded: {}", list.upgrades.len());
            next.set(AppState::InGame);
        }
    }
}
