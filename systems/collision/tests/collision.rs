use angkor_escape_core::Rect;
use angkor_escape_system_collision::{overlaps_any, resolve};
use glam::Vec2;

fn tile(column: u32, row: u32) -> Rect {
    Rect::new(column as f32 * 64.0, row as f32 * 64.0, 64.0, 64.0)
}

#[test]
fn diagonal_motion_slides_along_wall() {
    let wall = tile(1, 0);
    let hitbox = Rect::new(40.0, 80.0, 16.0, 32.0);

    let resolution = resolve(hitbox, Vec2::new(10.0, -30.0), &[wall]);

    assert!(!resolution.blocked_x, "x path below the wall is clear");
    assert!(resolution.blocked_y, "moving up would enter the wall");
    assert_eq!(resolution.hitbox.origin(), Vec2::new(50.0, 80.0));
    assert!(!overlaps_any(&resolution.hitbox, &[wall]));
}

#[test]
fn corner_blocks_both_axes() {
    let walls = [tile(1, 0), tile(0, 1), tile(1, 1)];
    let hitbox = Rect::new(40.0, 30.0, 16.0, 32.0);

    let resolution = resolve(hitbox, Vec2::new(20.0, 20.0), &walls);

    assert!(resolution.blocked_x);
    assert!(resolution.blocked_y);
    assert_eq!(resolution.hitbox, hitbox);
}

#[test]
fn flush_contact_is_not_a_collision() {
    let wall = tile(1, 0);
    let hitbox = Rect::new(40.0, 10.0, 16.0, 32.0);

    let resolution = resolve(hitbox, Vec2::new(8.0, 0.0), &[wall]);

    assert!(!resolution.blocked_x);
    assert_eq!(resolution.hitbox.right(), wall.left());
}

#[test]
fn resolution_never_leaves_hitbox_inside_walls() {
    let walls: Vec<Rect> = (0..5)
        .flat_map(|index| [tile(index, 0), tile(index, 4), tile(0, index), tile(4, index)])
        .chain([tile(2, 2)])
        .collect();
    let mut hitbox = Rect::new(80.0, 80.0, 16.0, 32.0);
    assert!(!overlaps_any(&hitbox, &walls));

    let mut state = 0x2545_f491_u32;
    for _ in 0..2_000 {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let dx = (state % 41) as f32 - 20.0;
        let dy = ((state >> 8) % 41) as f32 - 20.0;

        hitbox = resolve(hitbox, Vec2::new(dx, dy), &walls).hitbox;

        assert!(
            !overlaps_any(&hitbox, &walls),
            "hitbox {hitbox:?} overlaps a wall after displacement ({dx}, {dy})",
        );
    }
}
