use crate::{curve::*, settings::CurveSettings};
use bevy::{
    asset::load_internal_asset,
    prelude::*,
    reflect::TypeUuid,
    render::{
        render_resource::{AsBindGroup, PrimitiveTopology, ShaderRef},
        view::NoFrustumCulling,
    },
    sprite::{Material2d, Material2dPlugin, MaterialMesh2dBundle},
};
use tap::Tap;

pub const STROKE_SHADER_HANDLE: HandleUntyped =
    HandleUntyped::weak_from_u64(Shader::TYPE_UUID, 0x6b1f_3c8e_92d4_a057);

/// Flat colored stroke. Vertex positions bypass the camera and go straight to clip space.
#[derive(AsBindGroup, TypeUuid, Debug, Clone)]
#[uuid = "3f6c2d1e-8a4b-4c7f-9e25-b10d7a6f4c83"]
pub struct StrokeMaterial {
    #[uniform(0)]
    pub color: Color,
}

impl Material2d for StrokeMaterial {
    fn vertex_shader() -> ShaderRef {
        STROKE_SHADER_HANDLE.typed().into()
    }

    fn fragment_shader() -> ShaderRef {
        STROKE_SHADER_HANDLE.typed().into()
    }
}

/// The samples a drawn curve was built from.
#[derive(Component, Deref)]
pub struct SampledCurve(pub CurveBuffer);

/// Line strip over the buffer's points in emission order, positions only.
pub fn curve_mesh(buffer: &CurveBuffer) -> Mesh {
    Mesh::new(PrimitiveTopology::LineStrip)
        .tap_mut(|mesh| mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, buffer.positions_f32()))
}

pub fn spawn_curve(
    mut commands: Commands,
    settings: Res<CurveSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StrokeMaterial>>,
) {
    commands.insert_resource(ClearColor(settings.clear));

    let Ok(buffer) = settings
        .sample()
        .map_err(|err| error!("Could not sample curve: {err}"))
    else {
        return;
    };

    info!(
        "Sampled {} vertices for t in [0, {}]",
        buffer.vertex_count(),
        settings.tick.unwrap_or(DEFAULT_TICK)
    );

    commands.spawn(Camera2dBundle::default());
    commands.spawn((
        MaterialMesh2dBundle {
            mesh: meshes.add(curve_mesh(&buffer)).into(),
            material: materials.add(StrokeMaterial {
                color: settings.stroke,
            }),
            ..default()
        },
        NoFrustumCulling,
        SampledCurve(buffer),
    ));
}

pub struct CurvePlugin;

impl Plugin for CurvePlugin {
    fn build(&self, app: &mut App) {
        load_internal_asset!(app, STROKE_SHADER_HANDLE, "stroke.wgsl", Shader::from_wgsl);

        app.init_resource::<CurveSettings>()
            .add_plugin(Material2dPlugin::<StrokeMaterial>::default())
            .add_startup_system(spawn_curve);
    }
}

/// Wires the curve scene into an app that already carries a renderer.
pub fn install(app: &mut App) -> &mut App {
    app.add_plugin(CurvePlugin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::{render::mesh::VertexAttributeValues, sprite::Mesh2dHandle};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn headless(settings: CurveSettings) -> App {
        let mut game = App::new();
        game.add_plugins(MinimalPlugins)
            .add_plugin(AssetPlugin::default())
            .add_asset::<Mesh>()
            .add_asset::<StrokeMaterial>()
            .insert_resource(settings)
            .add_startup_system(spawn_curve);
        game
    }

    #[test_case(1; "single point")]
    #[test_case(2; "segment")]
    #[test_case(20; "scene default")]
    fn mesh_is_a_packed_line_strip(count: usize) {
        let buffer = CurveSettings::default().with_count(count).sample().unwrap();
        let mesh = curve_mesh(&buffer);

        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::LineStrip);
        assert_eq!(mesh.count_vertices(), buffer.len() / 3);
        assert_eq!(mesh.get_mesh_vertex_buffer_layout().layout().array_stride, 12);
        assert!(mesh.indices().is_none());

        match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
            Some(VertexAttributeValues::Float32x3(positions)) => {
                assert_eq!(positions, &buffer.positions_f32())
            }
            other => panic!("Unexpected position attribute: {other:?}"),
        }
    }

    #[test]
    fn spawns_the_configured_curve() {
        let settings = CurveSettings::default().with_color(Color::ORANGE);
        let expected = settings.sample().unwrap();
        let mut game = headless(settings);
        game.update();

        let mut curves = game
            .world
            .query::<(&Mesh2dHandle, &Handle<StrokeMaterial>, &SampledCurve)>();
        let (mesh, material, curve) = curves.single(&game.world);

        assert_eq!(**curve, expected);

        let mesh = game.world.resource::<Assets<Mesh>>().get(&mesh.0).unwrap();
        assert_eq!(mesh.count_vertices(), 20);
        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::LineStrip);

        let material = game
            .world
            .resource::<Assets<StrokeMaterial>>()
            .get(material)
            .unwrap();
        assert_eq!(material.color, Color::ORANGE);

        assert_eq!(game.world.resource::<ClearColor>().0, Color::BLACK);
        assert_eq!(
            game.world
                .query_filtered::<(), With<Camera2d>>()
                .iter(&game.world)
                .count(),
            1
        );
    }

    #[test_case(CurveSettings::default().with_count(0); "zero count")]
    #[test_case(CurveSettings::default().with_tick(f64::INFINITY); "infinite tick")]
    fn invalid_settings_spawn_nothing(settings: CurveSettings) {
        let mut game = headless(settings);
        game.update();

        assert_eq!(
            game.world
                .query::<&SampledCurve>()
                .iter(&game.world)
                .count(),
            0
        );
        assert!(game.world.resource::<Assets<Mesh>>().is_empty());
    }
}
