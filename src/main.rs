use bevy::prelude::*;
use chess_host::ChessHostPlugin;

fn main() {
    App::new()
        .add_plugins(ChessHostPlugin::default())
        .run();
}
