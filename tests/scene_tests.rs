//! Scene & Controller Tests
//!
//! Tests for:
//! - Node hierarchy (attach, world transform propagation)
//! - Skinned model components
//! - SkelAnimController state machine and looping playback
//! - SpinController
//! - Debug bone segments
//! - Sequential vs parallel controller updates (comparison needs `--features parallel`)

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::{Quat, Vec3};
use slotmap::Key;

use ember::{
    BoneDesc, BonePose, BoneTrack, Controller, ControllerHandle, DebugSettings, Material,
    MaterialFeatures, Mesh, MeshAttributes, Model, ModelDesc, NodeHandle, PlaybackStatus,
    ResourceError, ResourceManager, Scene, SkelAnimController, SkeletalClip, Skeleton,
    SpinController, SubModelDesc,
};

const EPSILON: f32 = 1e-5;

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

const NO_DEBUG: DebugSettings = DebugSettings {
    enabled: false,
    show_skeletons: false,
};

const SHOW_SKELETONS: DebugSettings = DebugSettings {
    enabled: true,
    show_skeletons: true,
};

/// Two-bone arm. The "slide" clip moves the root along +X by one unit per
/// frame over 10 frames, so after a tick the root's translation equals the
/// playback frame.
fn arm_model() -> Arc<Model> {
    let resources = ResourceManager::new();
    resources
        .add_mesh(Mesh::new(
            "arm_mesh",
            32,
            MeshAttributes::POSITIONS | MeshAttributes::VERT_WEIGHTS,
        ))
        .unwrap();
    resources
        .add_material(Material::new("arm_skin", MaterialFeatures::HW_SKINNING))
        .unwrap();
    resources
        .add_skeleton(
            Skeleton::new(
                "arm",
                vec![
                    BoneDesc::new("upper", None).with_head_tail(Vec3::ZERO, Vec3::Y),
                    BoneDesc::new("lower", Some(0))
                        .with_bind(Quat::IDENTITY, Vec3::Y)
                        .with_head_tail(Vec3::Y, Vec3::Y * 2.0),
                ],
            )
            .unwrap(),
        )
        .unwrap();
    resources
        .add_skel_anim(
            SkeletalClip::new(
                "slide",
                10,
                vec![0, 10],
                vec![
                    BoneTrack::new(vec![
                        BonePose::IDENTITY,
                        BonePose::new(Quat::IDENTITY, Vec3::X * 10.0),
                    ]),
                    BoneTrack::empty(),
                ],
            )
            .unwrap(),
        )
        .unwrap();

    resources
        .load_model(&ModelDesc {
            name: "arm".into(),
            skeleton: Some("arm".into()),
            sub_models: vec![SubModelDesc {
                mesh: "arm_mesh".into(),
                material: "arm_skin".into(),
                depth_material: "arm_skin".into(),
            }],
            skel_anims: vec!["slide".into()],
        })
        .unwrap()
}

fn slide(model: &Model) -> Arc<SkeletalClip> {
    Arc::clone(model.skel_anim_by_name("slide").unwrap())
}

/// Scene with one skinned arm node playing "slide" at `step`.
fn playing_arm(step: f32) -> (Scene, NodeHandle, ControllerHandle) {
    let model = arm_model();
    let mut scene = Scene::new();
    let node = scene.create_node("arm");
    scene.add_skinned_model(node, Arc::clone(&model)).unwrap();

    let mut controller = SkelAnimController::new(node, step);
    controller.bind(slide(&model));
    let handle = scene.add_controller(controller).unwrap();
    (scene, node, handle)
}

fn frame_of(scene: &Scene, handle: ControllerHandle) -> f32 {
    match scene.controller(handle) {
        Some(Controller::SkelAnim(c)) => c.frame(),
        other => panic!("expected SkelAnim controller, got {other:?}"),
    }
}

fn root_translation(scene: &Scene, node: NodeHandle) -> Vec3 {
    scene.skinned_model(node).unwrap().pose().translations[0]
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn attach_moves_node_out_of_roots() {
    let mut scene = Scene::new();
    let parent = scene.create_node("parent");
    let child = scene.create_node("child");
    assert_eq!(scene.root_nodes.len(), 2);

    scene.attach(child, parent);

    assert_eq!(scene.root_nodes, vec![parent]);
    assert_eq!(scene.get_node(child).unwrap().parent(), Some(parent));
    assert_eq!(scene.get_node(parent).unwrap().children(), &[child]);
}

#[test]
fn attach_to_self_is_ignored() {
    let mut scene = Scene::new();
    let node = scene.create_node("solo");
    scene.attach(node, node);
    assert_eq!(scene.root_nodes, vec![node]);
    assert_eq!(scene.get_node(node).unwrap().parent(), None);
}

#[test]
fn world_transform_follows_parent() {
    let mut scene = Scene::new();
    let parent = scene.create_node("parent");
    let child = scene.create_node("child");
    scene.attach(child, parent);

    scene.get_node_mut(parent).unwrap().transform.position = Vec3::new(0.0, 0.0, 3.0);
    scene.get_node_mut(child).unwrap().transform.position = Vec3::X;
    scene.update_world_transforms();

    let world = scene.get_node(child).unwrap().world_matrix();
    assert!(approx_vec3(world.translation.into(), Vec3::new(1.0, 0.0, 3.0)));
}

// ============================================================================
// Skinned models
// ============================================================================

#[test]
fn skinned_model_buffers_sized_to_skeleton() {
    let model = arm_model();
    let mut scene = Scene::new();
    let a = scene.create_node("a");
    let b = scene.create_node("b");
    scene.add_skinned_model(a, Arc::clone(&model)).unwrap();
    scene.add_skinned_model(b, Arc::clone(&model)).unwrap();

    let skinned_a = scene.skinned_model(a).unwrap();
    let skinned_b = scene.skinned_model(b).unwrap();
    assert_eq!(skinned_a.pose().len(), 2);
    assert!(Arc::ptr_eq(skinned_a.skeleton(), skinned_b.skeleton()));
    assert!(skinned_a.bone_lines().is_none());
    assert_eq!(scene.skinned_models().count(), 2);
}

#[test]
fn model_without_skeleton_cannot_be_skinned() {
    let resources = ResourceManager::new();
    resources
        .add_mesh(Mesh::new("box", 8, MeshAttributes::POSITIONS))
        .unwrap();
    resources
        .add_material(Material::new("flat", MaterialFeatures::empty()))
        .unwrap();
    let model = resources
        .load_model(&ModelDesc {
            name: "box".into(),
            skeleton: None,
            sub_models: vec![SubModelDesc {
                mesh: "box".into(),
                material: "flat".into(),
                depth_material: "flat".into(),
            }],
            skel_anims: vec![],
        })
        .unwrap();

    let mut scene = Scene::new();
    let node = scene.create_node("box");
    let err = scene.add_skinned_model(node, model).unwrap_err();
    assert!(matches!(err.root(), ResourceError::NotFound { kind: "Skeleton", .. }));
    assert!(scene.skinned_model(node).is_none());
}

#[test]
fn skinned_model_needs_existing_node() {
    let mut scene = Scene::new();
    let err = scene
        .add_skinned_model(NodeHandle::null(), arm_model())
        .unwrap_err();
    assert!(matches!(err, ResourceError::NotFound { kind: "Node", .. }));
}

// ============================================================================
// SkelAnimController
// ============================================================================

#[test]
fn controller_starts_stopped_and_bind_starts_playing() {
    let model = arm_model();
    let mut scene = Scene::new();
    let node = scene.create_node("arm");

    let mut controller = SkelAnimController::new(node, 1.0);
    assert_eq!(controller.status(), PlaybackStatus::Stopped);
    assert!(controller.clip().is_none());

    controller.bind(slide(&model));
    assert_eq!(controller.status(), PlaybackStatus::Playing);
    assert_eq!(controller.frame(), 0.0);
    assert_eq!(controller.clip().unwrap().name(), "slide");
}

#[test]
fn rebinding_rewinds_playback() {
    let (mut scene, _, handle) = playing_arm(2.0);
    for _ in 0..3 {
        scene.update_controllers(1.0 / 60.0, &NO_DEBUG, false);
    }
    assert_eq!(frame_of(&scene, handle), 6.0);

    let clip = scene
        .skel_anim_controller_mut(handle)
        .unwrap()
        .clip()
        .cloned()
        .unwrap();
    scene.skel_anim_controller_mut(handle).unwrap().bind(clip);
    assert_eq!(frame_of(&scene, handle), 0.0);
}

#[test]
fn playback_loops_back_to_zero() {
    let (mut scene, node, handle) = playing_arm(3.0);

    let mut frames = Vec::new();
    let mut roots = Vec::new();
    for _ in 0..6 {
        scene.update_controllers(1.0 / 60.0, &NO_DEBUG, false);
        frames.push(frame_of(&scene, handle));
        roots.push(root_translation(&scene, node).x);
    }

    assert_eq!(frames, vec![3.0, 6.0, 9.0, 0.0, 3.0, 6.0]);
    for (frame, x) in frames.iter().zip(&roots) {
        assert!((frame - x).abs() < EPSILON, "frame {frame}, root x {x}");
    }
}

#[test]
fn step_can_change_while_playing() {
    let (mut scene, _, handle) = playing_arm(1.0);
    scene.update_controllers(0.0, &NO_DEBUG, false);
    scene.skel_anim_controller_mut(handle).unwrap().set_step(4.0);
    scene.update_controllers(0.0, &NO_DEBUG, false);
    assert_eq!(frame_of(&scene, handle), 5.0);
}

#[test]
fn child_bone_follows_animated_root() {
    let (mut scene, node, _) = playing_arm(2.0);
    scene.update_controllers(0.0, &NO_DEBUG, false);

    let pose = scene.skinned_model(node).unwrap().pose();
    assert!(approx_vec3(pose.translations[0], Vec3::X * 2.0));
    assert!(approx_vec3(pose.translations[1], Vec3::X * 2.0));
}

#[test]
#[should_panic(expected = "without a bound clip")]
fn ticking_unbound_controller_panics() {
    let model = arm_model();
    let mut scene = Scene::new();
    let node = scene.create_node("arm");
    scene.add_skinned_model(node, model).unwrap();
    scene.add_controller(SkelAnimController::new(node, 1.0));

    scene.update_controllers(1.0 / 60.0, &NO_DEBUG, false);
}

#[test]
#[should_panic(expected = "does not fit the skeleton")]
fn clip_for_another_skeleton_panics_on_tick() {
    let (mut scene, _, handle) = playing_arm(1.0);
    let three_tracks = SkeletalClip::new("tail", 4, vec![0], vec![BoneTrack::empty(); 3]).unwrap();
    scene
        .skel_anim_controller_mut(handle)
        .unwrap()
        .bind(Arc::new(three_tracks));

    scene.update_controllers(1.0 / 60.0, &NO_DEBUG, false);
}

#[test]
#[should_panic(expected = "must be finite and non-negative")]
fn negative_step_panics() {
    let (mut scene, _, handle) = playing_arm(1.0);
    scene.skel_anim_controller_mut(handle).unwrap().set_step(-1.0);
}

#[test]
fn second_skel_anim_controller_is_refused() {
    let (mut scene, node, _) = playing_arm(1.0);

    assert!(scene.add_controller(SkelAnimController::new(node, 1.0)).is_none());
    // Other controller kinds may share the node
    assert!(scene.add_controller(SpinController::new(node, Vec3::Y, 1.0)).is_some());
}

#[test]
fn controller_without_skinned_target_is_skipped() {
    let model = arm_model();
    let mut scene = Scene::new();
    let plain = scene.create_node("plain");

    let mut controller = SkelAnimController::new(plain, 1.0);
    controller.bind(slide(&model));
    let handle = scene.add_controller(controller).unwrap();

    scene.update_controllers(1.0 / 60.0, &NO_DEBUG, false);
    assert_eq!(frame_of(&scene, handle), 0.0);
}

#[test]
fn removed_controller_stops_driving_node() {
    let (mut scene, node, handle) = playing_arm(1.0);
    scene.update_controllers(0.0, &NO_DEBUG, false);
    assert!(scene.remove_controller(handle).is_some());

    scene.update_controllers(0.0, &NO_DEBUG, false);
    assert!(approx_vec3(root_translation(&scene, node), Vec3::X));
}

// ============================================================================
// Debug bone lines
// ============================================================================

#[test]
fn bone_lines_only_when_debug_draws_skeletons() {
    let (mut scene, node, _) = playing_arm(1.0);

    let debug_without_skeletons = DebugSettings {
        enabled: true,
        show_skeletons: false,
    };
    scene.update_controllers(0.0, &debug_without_skeletons, false);
    assert!(scene.skinned_model(node).unwrap().bone_lines().is_none());

    scene.update_controllers(0.0, &SHOW_SKELETONS, false);
    let lines = scene.skinned_model(node).unwrap().bone_lines().unwrap();
    assert_eq!(lines.len(), 2);
    // Root slid to frame 2 along X
    assert!(approx_vec3(lines.heads[0], Vec3::X * 2.0));
    assert!(approx_vec3(lines.tails[1], Vec3::new(2.0, 2.0, 0.0)));

    scene.update_controllers(0.0, &NO_DEBUG, false);
    assert!(scene.skinned_model(node).unwrap().bone_lines().is_none());
    assert_eq!(scene.debug_bone_segments().count(), 0);
}

#[test]
fn debug_segments_are_in_world_space() {
    let (mut scene, node, _) = playing_arm(1.0);
    scene.get_node_mut(node).unwrap().transform.position = Vec3::new(0.0, 0.0, 5.0);

    scene.update_controllers(0.0, &SHOW_SKELETONS, false);
    scene.update_world_transforms();

    let segments: Vec<_> = scene.debug_bone_segments().collect();
    assert_eq!(segments.len(), 2);
    assert!(approx_vec3(segments[0].0, Vec3::new(1.0, 0.0, 5.0)));
    assert!(approx_vec3(segments[0].1, Vec3::new(1.0, 1.0, 5.0)));
    assert!(approx_vec3(segments[1].1, Vec3::new(1.0, 2.0, 5.0)));
}

// ============================================================================
// SpinController
// ============================================================================

#[test]
fn spin_rotates_node_by_speed_times_dt() {
    let mut scene = Scene::new();
    let node = scene.create_node("top");
    scene.add_controller(SpinController::new(node, Vec3::Z, FRAC_PI_2));

    scene.update_controllers(0.5, &NO_DEBUG, false);
    scene.update_controllers(0.5, &NO_DEBUG, false);
    scene.update_world_transforms();

    let world = scene.get_node(node).unwrap().world_matrix();
    assert!(approx_vec3(world.transform_point3(Vec3::X), Vec3::Y));
}

#[test]
fn spin_axis_is_normalized() {
    let mut scene = Scene::new();
    let node = scene.create_node("top");
    scene.add_controller(SpinController::new(node, Vec3::Y * 4.0, 1.0));
    scene.update_controllers(1.0, &NO_DEBUG, false);

    let rotation = scene.get_node(node).unwrap().transform.rotation;
    assert!(rotation.abs_diff_eq(Quat::from_rotation_y(1.0), EPSILON));
}

// ============================================================================
// Parallel update
// ============================================================================

#[test]
fn parallel_request_still_runs_every_controller() {
    // Holds with and without the `parallel` feature
    let (mut scene, node, handle) = playing_arm(2.0);
    scene
        .add_controller(SpinController::new(node, Vec3::Y, 1.0))
        .unwrap();

    scene.update_controllers(1.0, &NO_DEBUG, true);
    scene.update_controllers(1.0, &NO_DEBUG, true);

    assert_eq!(frame_of(&scene, handle), 4.0);
    assert!(approx_vec3(root_translation(&scene, node), Vec3::X * 4.0));
    let rotation = scene.get_node(node).unwrap().transform.rotation;
    assert!(rotation.abs_diff_eq(Quat::from_rotation_y(2.0), EPSILON));
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_update_skips_missing_targets() {
    let model = arm_model();
    let (mut scene, node, handle) = playing_arm(1.0);
    let plain = scene.create_node("plain");
    let mut orphan = SkelAnimController::new(plain, 1.0);
    orphan.bind(slide(&model));
    let orphan = scene.add_controller(orphan).unwrap();

    scene.update_controllers(1.0 / 60.0, &NO_DEBUG, true);

    assert_eq!(frame_of(&scene, handle), 1.0);
    assert_eq!(frame_of(&scene, orphan), 0.0);
    assert!(approx_vec3(root_translation(&scene, node), Vec3::X));
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_update_matches_sequential() {
    let model = arm_model();

    let build = || {
        let mut scene = Scene::new();
        let nodes: Vec<_> = (0..8)
            .map(|i| {
                let node = scene.create_node(&format!("arm_{i}"));
                scene.add_skinned_model(node, Arc::clone(&model)).unwrap();
                let mut controller = SkelAnimController::new(node, 0.5 + i as f32 * 0.25);
                controller.bind(slide(&model));
                scene.add_controller(controller).unwrap();
                node
            })
            .collect();
        (scene, nodes)
    };

    let (mut sequential, seq_nodes) = build();
    let (mut parallel, par_nodes) = build();

    for _ in 0..13 {
        sequential.update_controllers(1.0 / 60.0, &SHOW_SKELETONS, false);
        parallel.update_controllers(1.0 / 60.0, &SHOW_SKELETONS, true);
    }

    for (s, p) in seq_nodes.into_iter().zip(par_nodes) {
        let s = sequential.skinned_model(s).unwrap();
        let p = parallel.skinned_model(p).unwrap();
        assert_eq!(s.pose(), p.pose());
        assert_eq!(s.bone_lines(), p.bone_lines());
    }
}
