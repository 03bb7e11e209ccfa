pub mod cache;
pub mod components;
pub mod events;
mod systems;

use crate::core::states::AppState;
use bevy::prelude::*;
use events::*;
use systems::*;

pub struct UpgradesPlugin;
impl Plugin for UpgradesPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<InstallUpgradeEvent>()
            .add_event::<RemoveUpgradeEvent>()
            .add_event::<ListUpgradesEvent>()
            .add_event::<SetCreativeEvent>()
            .add_event::<AddAirEvent>()
            .add_event::<SaveToolEvent>()
            .add_event::<LoadToolEvent>()
            .add_systems(OnEnter(AppState::InGame), setup_tool)
            .add_systems(
                Update,
                (
                    install_upgrade,
                    remove_upgrade,
                    list_installed,
                    set_creative,
                    add_air,
                    save_tool,
                    load_tool,
                )
                    .run_if(in_state(AppState::InGame)),
            );
    }
}
