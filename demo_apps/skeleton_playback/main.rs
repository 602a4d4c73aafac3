//! Skeleton Playback Demo
//!
//! Builds a four-bone arm, loops a wave clip on it and logs where each bone
//! ends up every few ticks. Run with `RUST_LOG=debug` for load details.

use std::f32::consts::FRAC_PI_4;

use ember::prelude::*;

const BONES: usize = 4;
const FRAME_COUNT: u32 = 48;
const TICKS: u32 = 120;

fn build_arm() -> anyhow::Result<Skeleton> {
    let descs = (0..BONES)
        .map(|i| {
            let parent = i.checked_sub(1);
            let offset = if i == 0 { Vec3::ZERO } else { Vec3::Y };
            BoneDesc::new(format!("arm_{i}"), parent)
                .with_bind(Quat::IDENTITY, offset)
                .with_head_tail(Vec3::Y * i as f32, Vec3::Y * (i + 1) as f32)
        })
        .collect();
    Ok(Skeleton::new("arm", descs)?)
}

fn build_wave() -> anyhow::Result<SkeletalClip> {
    let keyframes = vec![0, FRAME_COUNT / 2, FRAME_COUNT];
    let tracks = (0..BONES)
        .map(|i| {
            if i == 0 {
                return BoneTrack::empty();
            }
            let bend = Quat::from_rotation_z(FRAC_PI_4 / i as f32);
            BoneTrack::new(vec![
                BonePose::IDENTITY,
                BonePose::new(bend, Vec3::ZERO),
                BonePose::IDENTITY,
            ])
        })
        .collect();
    Ok(SkeletalClip::new("wave", FRAME_COUNT, keyframes, tracks)?)
}

fn main() -> anyhow::Result<()> {
    ember::init_logger();

    let settings = EngineSettings::from_json(
        r#"{ "animation": { "default_step": 1.0 }, "debug": { "enabled": true, "show_skeletons": true } }"#,
    )?;
    let mut engine = Engine::new(settings);

    engine.resources.add_mesh(Mesh::new(
        "arm_mesh",
        256,
        MeshAttributes::POSITIONS | MeshAttributes::NORMALS | MeshAttributes::VERT_WEIGHTS,
    ))?;
    engine
        .resources
        .add_material(Material::new("arm_skin", MaterialFeatures::HW_SKINNING))?;
    engine.resources.add_skeleton(build_arm()?)?;
    engine.resources.add_skel_anim(build_wave()?)?;

    let desc = ModelDesc {
        name: "arm".into(),
        skeleton: Some("arm".into()),
        sub_models: vec![SubModelDesc {
            mesh: "arm_mesh".into(),
            material: "arm_skin".into(),
            depth_material: "arm_skin".into(),
        }],
        skel_anims: vec!["wave".into()],
    };

    let arm = engine.spawn_model("arm", &desc)?;
    engine.scene.add_controller(SpinController::new(arm, Vec3::Y, 0.5));
    engine.play_skel_anim(arm, "wave")?;

    for _ in 0..TICKS {
        engine.tick(1.0 / 60.0);

        if engine.frame() % 12 != 0 {
            continue;
        }
        if let Some(skinned) = engine.scene.skinned_model(arm) {
            let tip = skinned.pose().bone_transform(BONES - 1).translation;
            log::info!("frame {:>4}: tip bone origin {tip:.3}", engine.frame());
        }
        for (head, tail) in engine.scene.debug_bone_segments() {
            log::debug!("  bone {head:.2} -> {tail:.2}");
        }
    }

    let palettes: Vec<_> = engine.skinning_palettes().collect();
    log::info!(
        "Done: {} skinned node(s), {} joint matrices",
        palettes.len(),
        palettes.iter().map(|(_, p)| p.len()).sum::<usize>()
    );
    Ok(())
}
