//! Network mesh animation.
//!
//! Nodes drift, bounce off the edges and are pulled gently toward the
//! pointer. Nodes closer than the link distance are joined by lines.

use glam::Vec2;
use lumen_core::{DisplayMode, Rgb, Rgba, SurfaceSize};
use rand::rngs::StdRng;

use super::{Animation, between, signed};
use crate::surface::Surface;

/// Tunables for the network mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkSettings {
    /// Number of nodes, fixed for the lifetime of a mount.
    pub node_count: usize,
    /// Pointer distance under which nodes are attracted and highlighted.
    pub pointer_radius: f32,
    /// Maximum distance for node-to-node and node-to-pointer lines.
    pub link_distance: f32,
    /// Attraction strength at zero distance.
    pub attraction: f32,
    /// Velocity multiplier applied every frame.
    pub damping: f32,
    /// Initial velocity components are drawn from `±initial_speed`.
    pub initial_speed: f32,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            node_count: 120,
            pointer_radius: 200.0,
            link_distance: 250.0,
            attraction: 0.02,
            damping: 0.98,
            initial_speed: 0.25,
        }
    }
}

/// A single mesh node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    /// Distance to the pointer as of the last update, `None` without a pointer.
    pub pointer_distance: Option<f32>,
}

impl Node {
    pub fn new(position: Vec2, velocity: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
            pointer_distance: None,
        }
    }

    fn within(&self, distance: f32) -> bool {
        self.pointer_distance.is_some_and(|d| d < distance)
    }
}

/// Entity store for [`Network`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkStore {
    pub nodes: Vec<Node>,
}

/// Colors used by the mesh for one display mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkPalette {
    pub background: Rgb,
    pub node: Rgba,
    pub node_near: Rgb,
    pub link: Rgb,
    pub link_near: Rgb,
    /// Opacity of a link between two coincident nodes.
    pub link_alpha: f32,
    pub pointer: Rgb,
}

impl NetworkPalette {
    pub fn for_mode(mode: DisplayMode) -> Self {
        match mode {
            DisplayMode::Dark => Self {
                background: Rgb::new(2, 6, 23),
                node: Rgba::new(148, 163, 184, 0.6),
                node_near: Rgb::new(34, 211, 238),
                link: Rgb::new(100, 116, 139),
                link_near: Rgb::new(56, 189, 248),
                link_alpha: 0.35,
                pointer: Rgb::new(34, 211, 238),
            },
            DisplayMode::Light => Self {
                background: Rgb::new(248, 250, 252),
                node: Rgba::new(100, 116, 139, 0.5),
                node_near: Rgb::new(2, 132, 199),
                link: Rgb::new(148, 163, 184),
                link_near: Rgb::new(14, 165, 233),
                link_alpha: 0.4,
                pointer: Rgb::new(2, 132, 199),
            },
        }
    }
}

/// Network mesh animation.
#[derive(Debug, Clone, Default)]
pub struct Network {
    settings: NetworkSettings,
}

impl Network {
    pub fn new(settings: NetworkSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &NetworkSettings {
        &self.settings
    }

    /// Advance one node by one frame.
    pub fn step(&self, node: &mut Node, pointer: Option<Vec2>, size: SurfaceSize) {
        let s = &self.settings;

        node.position += node.velocity;
        if node.position.x < 0.0 || node.position.x > size.width {
            node.velocity.x = -node.velocity.x;
        }
        if node.position.y < 0.0 || node.position.y > size.height {
            node.velocity.y = -node.velocity.y;
        }
        node.position = node
            .position
            .clamp(Vec2::ZERO, Vec2::new(size.width, size.height));

        node.pointer_distance = pointer.map(|p| node.position.distance(p));
        if let (Some(p), Some(d)) = (pointer, node.pointer_distance)
            && d < s.pointer_radius
            && d > 0.0
        {
            let force = (s.pointer_radius - d) / s.pointer_radius;
            node.velocity += (p - node.position) / d * force * s.attraction;
        }

        node.velocity *= s.damping;
    }
}

impl Animation for Network {
    type Store = NetworkStore;

    fn init(&self, size: SurfaceSize, rng: &mut StdRng) -> NetworkStore {
        let speed = self.settings.initial_speed;
        let nodes = (0..self.settings.node_count)
            .map(|_| {
                Node::new(
                    Vec2::new(
                        between(rng, 0.0, size.width),
                        between(rng, 0.0, size.height),
                    ),
                    Vec2::new(signed(rng, speed), signed(rng, speed)),
                    between(rng, 1.0, 3.0),
                )
            })
            .collect();
        NetworkStore { nodes }
    }

    fn update(
        &self,
        store: &mut NetworkStore,
        pointer: Option<Vec2>,
        size: SurfaceSize,
        _rng: &mut StdRng,
    ) {
        for node in &mut store.nodes {
            self.step(node, pointer, size);
        }
    }

    fn draw(
        &self,
        store: &NetworkStore,
        pointer: Option<Vec2>,
        mode: DisplayMode,
        surface: &mut dyn Surface,
    ) {
        let s = &self.settings;
        let palette = NetworkPalette::for_mode(mode);
        surface.clear(palette.background);

        let nodes = &store.nodes;
        for (i, a) in nodes.iter().enumerate() {
            for b in &nodes[i + 1..] {
                let d = a.position.distance(b.position);
                if d >= s.link_distance {
                    continue;
                }
                let alpha = (1.0 - d / s.link_distance) * palette.link_alpha;
                let color = if a.within(s.pointer_radius) || b.within(s.pointer_radius) {
                    palette.link_near
                } else {
                    palette.link
                };
                surface.line(a.position, b.position, color.with_alpha(alpha));
            }
        }

        for node in nodes {
            if let (Some(p), Some(d)) = (pointer, node.pointer_distance)
                && d < s.link_distance
            {
                let strength = 1.0 - d / s.link_distance;
                surface.line(node.position, p, palette.pointer.with_alpha(strength * 0.5));
                surface.stroke_circle(
                    node.position,
                    node.radius * 4.0,
                    palette.pointer.with_alpha(strength * 0.4),
                );
            }

            let color = match node.pointer_distance {
                Some(d) if d < s.pointer_radius => {
                    let proximity = 1.0 - d / s.pointer_radius;
                    palette.node_near.with_alpha(0.5 + 0.5 * proximity)
                }
                _ => palette.node,
            };
            surface.fill_circle(node.position, node.radius, color);
        }
    }

    fn background(&self, mode: DisplayMode) -> Rgb {
        NetworkPalette::for_mode(mode).background
    }

    fn entity_count(&self, store: &NetworkStore) -> usize {
        store.nodes.len()
    }

    fn positions(&self, store: &NetworkStore) -> Vec<Vec2> {
        store.nodes.iter().map(|n| n.position).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, DrawLog};
    use rand::SeedableRng;

    /// Test-only bounds check: position lies in [0, width] x [0, height].
    trait SurfaceBounds {
        fn contains(&self, p: glam::Vec2) -> bool;
    }

    impl SurfaceBounds for SurfaceSize {
        fn contains(&self, p: glam::Vec2) -> bool {
            (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
        }
    }

    const SIZE: SurfaceSize = SurfaceSize::new(800.0, 600.0);

    fn still_node(x: f32, y: f32) -> Node {
        Node::new(Vec2::new(x, y), Vec2::ZERO, 2.0)
    }

    fn draw_one(node: Node, pointer: Option<Vec2>, mode: DisplayMode) -> DrawLog {
        let network = Network::default();
        let mut store = NetworkStore { nodes: vec![node] };
        let mut rng = StdRng::seed_from_u64(0);
        network.update(&mut store, pointer, SIZE, &mut rng);
        let mut log = DrawLog::new(SIZE);
        network.draw(&store, pointer, mode, &mut log);
        log
    }

    #[test]
    fn test_init_creates_fixed_count_inside_bounds() {
        let network = Network::default();
        let mut rng = StdRng::seed_from_u64(7);
        let store = network.init(SIZE, &mut rng);
        assert_eq!(network.entity_count(&store), 120);
        for node in &store.nodes {
            assert!((0.0..=SIZE.width).contains(&node.position.x));
            assert!((0.0..=SIZE.height).contains(&node.position.y));
            assert!(node.velocity.x.abs() <= 0.25 && node.velocity.y.abs() <= 0.25);
            assert!((1.0..=3.0).contains(&node.radius));
        }
    }

    #[test]
    fn test_positions_stay_in_bounds() {
        let network = Network::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut store = network.init(SIZE, &mut rng);
        for node in &mut store.nodes {
            node.velocity *= 40.0;
        }
        let pointer = Some(Vec2::new(790.0, 10.0));
        for _ in 0..500 {
            network.update(&mut store, pointer, SIZE, &mut rng);
            assert!(store.nodes.iter().all(|n| SIZE.contains(n.position)));
        }
    }

    #[test]
    fn test_bounce_reflects_and_clamps() {
        let network = Network::default();
        let mut node = Node::new(Vec2::new(799.5, 300.0), Vec2::new(1.0, 0.0), 2.0);
        network.step(&mut node, None, SIZE);
        assert_eq!(node.position.x, 800.0);
        assert!(node.velocity.x < 0.0);
        assert!((node.velocity.x + 0.98).abs() < 1e-6);
    }

    #[test]
    fn test_damping_without_pointer() {
        let network = Network::default();
        let mut node = Node::new(Vec2::new(100.0, 100.0), Vec2::new(1.0, -1.0), 2.0);
        network.step(&mut node, None, SIZE);
        assert_eq!(node.position, Vec2::new(101.0, 99.0));
        assert!((node.velocity - Vec2::new(0.98, -0.98)).length() < 1e-6);
        assert_eq!(node.pointer_distance, None);
    }

    #[test]
    fn test_attraction_inside_radius_only() {
        let network = Network::default();

        let mut near = still_node(300.0, 300.0);
        network.step(&mut near, Some(Vec2::new(400.0, 300.0)), SIZE);
        assert!(near.velocity.x > 0.0);
        assert_eq!(near.velocity.y, 0.0);
        // force = 0.5, attraction = 0.02, damping = 0.98
        assert!((near.velocity.x - 0.5 * 0.02 * 0.98).abs() < 1e-6);

        let mut far = still_node(300.0, 300.0);
        network.step(&mut far, Some(Vec2::new(550.0, 300.0)), SIZE);
        assert_eq!(far.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_pointer_on_node_applies_no_force() {
        let network = Network::default();
        let mut node = still_node(300.0, 300.0);
        network.step(&mut node, Some(Vec2::new(300.0, 300.0)), SIZE);
        assert_eq!(node.velocity, Vec2::ZERO);
        assert_eq!(node.pointer_distance, Some(0.0));
    }

    #[test]
    fn test_near_color_at_150_default_at_250() {
        let palette = NetworkPalette::for_mode(DisplayMode::Dark);

        let node = still_node(300.0, 300.0);
        let log = draw_one(node, Some(Vec2::new(450.0, 300.0)), DisplayMode::Dark);
        let color = log.circles_at(Vec2::new(300.0, 300.0)).next().copied();
        let color = color.expect("node drawn");
        assert_eq!(color.rgb, palette.node_near);
        assert!((color.a - (0.5 + 0.5 * 0.25)).abs() < 1e-6);

        let node = still_node(300.0, 300.0);
        let log = draw_one(node, Some(Vec2::new(550.0, 300.0)), DisplayMode::Dark);
        let color = log.circles_at(Vec2::new(300.0, 300.0)).next().copied();
        assert_eq!(color, Some(palette.node));
    }

    #[test]
    fn test_highlight_line_and_ring_near_pointer() {
        let pointer = Vec2::new(520.0, 300.0);
        let log = draw_one(still_node(300.0, 300.0), Some(pointer), DisplayMode::Dark);
        assert!(log.lines().any(|(from, to, _)| from == Vec2::new(300.0, 300.0) && to == pointer));
        assert!(log.commands.iter().any(|c| matches!(
            c,
            DrawCommand::StrokeCircle { radius, .. } if *radius == 8.0
        )));

        let log = draw_one(still_node(300.0, 300.0), None, DisplayMode::Dark);
        assert_eq!(log.lines().count(), 0);
        assert!(!log.commands.iter().any(|c| matches!(c, DrawCommand::StrokeCircle { .. })));
    }

    #[test]
    fn test_links_once_per_pair_within_distance() {
        let network = Network::default();
        let store = NetworkStore {
            nodes: vec![
                still_node(100.0, 100.0),
                still_node(200.0, 100.0),
                still_node(600.0, 100.0),
            ],
        };
        let mut log = DrawLog::new(SIZE);
        network.draw(&store, None, DisplayMode::Dark, &mut log);

        let lines: Vec<_> = log.lines().collect();
        assert_eq!(lines.len(), 1);
        let (from, to, color) = lines[0];
        assert_eq!((from, to), (Vec2::new(100.0, 100.0), Vec2::new(200.0, 100.0)));
        assert!((color.a - 0.6 * 0.35).abs() < 1e-6);
        assert_eq!(color.rgb, NetworkPalette::for_mode(DisplayMode::Dark).link);
    }

    #[test]
    fn test_link_highlighted_when_endpoint_near_pointer() {
        let network = Network::default();
        let mut store = NetworkStore {
            nodes: vec![still_node(100.0, 100.0), still_node(300.0, 100.0)],
        };
        let pointer = Some(Vec2::new(50.0, 100.0));
        let mut rng = StdRng::seed_from_u64(0);
        network.update(&mut store, pointer, SIZE, &mut rng);
        let mut log = DrawLog::new(SIZE);
        network.draw(&store, pointer, DisplayMode::Light, &mut log);

        let palette = NetworkPalette::for_mode(DisplayMode::Light);
        let (_, _, color) = log
            .lines()
            .find(|(_, to, _)| to.x > 200.0)
            .expect("link between nodes");
        assert_eq!(color.rgb, palette.link_near);
    }

    #[test]
    fn test_clear_uses_mode_background() {
        for mode in [DisplayMode::Dark, DisplayMode::Light] {
            let log = draw_one(still_node(10.0, 10.0), None, mode);
            assert_eq!(
                log.commands.first(),
                Some(&DrawCommand::Clear(NetworkPalette::for_mode(mode).background))
            );
        }
    }
}
