use bevy::prelude::*;

fn main() {
    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Cubic Bézier".into(),
            ..default()
        }),
        ..default()
    }));

    bezier_strip::install(&mut app).run();
}
