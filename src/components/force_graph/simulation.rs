//! Force-directed layout simulation.
//!
//! An owned, explicitly stepped simulation: the caller decides when to advance
//! it (typically once per animation frame). Each step applies link springs,
//! gravity toward the centre of the layout area and pairwise charge, then
//! integrates velocities with friction. A cooling factor (`alpha`) scales all
//! forces and decays every step so the layout comes to rest.

use std::f64::consts::{PI, TAU};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::model::ResolvedGraph;

/// Squared distances below this are clamped when computing charge, so close
/// pairs cannot produce unbounded forces.
const MIN_DISTANCE_SQ: f64 = 1.0;

/// Separation used for pairs that sit exactly on top of each other.
const JITTER_DISTANCE: f64 = 0.01;

/// Tunable layout constants.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationParameters {
	/// Layout area width. Gravity pulls toward its centre.
	pub width: f64,
	/// Layout area height.
	pub height: f64,
	/// Rest length of link springs.
	pub link_distance: f64,
	/// Spring stiffness in `0.0..=1.0`.
	pub link_strength: f64,
	/// Pairwise charge. Negative values repel.
	pub charge: f64,
	/// Pull toward the centre of the layout area.
	pub gravity: f64,
	/// Velocity retained per step (`1.0` = no damping).
	pub friction: f64,
	/// Alpha after (re)start.
	pub alpha_start: f64,
	/// Fraction of alpha lost per step.
	pub alpha_decay: f64,
	/// The simulation settles once alpha drops below this.
	pub alpha_min: f64,
	/// Radius of the circle nodes start on.
	pub initial_radius: f64,
	/// Clamp positions into the layout area.
	pub contain: bool,
}

impl Default for SimulationParameters {
	fn default() -> Self {
		Self {
			width: 960.0,
			height: 500.0,
			link_distance: 60.0,
			link_strength: 1.0,
			charge: -300.0,
			gravity: 0.1,
			friction: 0.9,
			alpha_start: 0.1,
			alpha_decay: 0.01,
			alpha_min: 0.005,
			initial_radius: 100.0,
			contain: false,
		}
	}
}

impl SimulationParameters {
	/// Centre of the layout area.
	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}
}

/// Live physical state of one component.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeState {
	/// Horizontal position in graph units.
	pub x: f64,
	/// Vertical position in graph units.
	pub y: f64,
	/// Horizontal velocity carried into the next step.
	pub vx: f64,
	/// Vertical velocity carried into the next step.
	pub vy: f64,
	/// Pinned by the user; the integrator leaves the position alone.
	pub fixed: bool,
}

/// Emitted for every step that moved the layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
	/// Number of steps taken so far, this one included.
	pub iteration: u64,
	/// Temperature the step ran at.
	pub alpha: f64,
}

/// Lifecycle of a [`Simulation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
	/// Forces are being applied every step.
	Running,
	/// Cooled down; `resume` restarts it.
	Settled,
	/// Permanently halted (graph replaced or view torn down).
	Stopped,
}

#[derive(Clone, Copy, Debug)]
struct Spring {
	source: usize,
	target: usize,
	/// Share of the correction applied to the target.
	bias: f64,
}

/// Force-directed layout over the nodes of one [`ResolvedGraph`].
pub struct Simulation {
	params: SimulationParameters,
	nodes: Vec<NodeState>,
	springs: Vec<Spring>,
	alpha: f64,
	iteration: u64,
	state: RunState,
}

impl Simulation {
	/// Place every component on a circle around the centre and start running.
	pub fn new(graph: &ResolvedGraph, params: SimulationParameters) -> Self {
		let count = graph.len();
		let (cx, cy) = params.center();
		let nodes = (0..count)
			.map(|i| {
				let angle = (i as f64) * 2.0 * PI / count as f64;
				NodeState {
					x: cx + params.initial_radius * angle.cos(),
					y: cy + params.initial_radius * angle.sin(),
					..NodeState::default()
				}
			})
			.collect();

		let springs = graph
			.links()
			.iter()
			.filter(|link| link.source != link.target)
			.map(|link| {
				let (ds, dt) = (
					graph.degree(link.source) as f64,
					graph.degree(link.target) as f64,
				);
				Spring {
					source: link.source,
					target: link.target,
					bias: ds / (ds + dt),
				}
			})
			.collect();

		debug!(
			"component-graph: simulation started with {} nodes, alpha {}",
			count, params.alpha_start
		);

		Self {
			alpha: params.alpha_start,
			params,
			nodes,
			springs,
			iteration: 0,
			state: RunState::Running,
		}
	}

	/// Parameters in effect, including the current layout area.
	pub fn params(&self) -> &SimulationParameters {
		&self.params
	}

	/// Node states, indexed like the graph's components.
	pub fn nodes(&self) -> &[NodeState] {
		&self.nodes
	}

	/// State of the node at `index`.
	pub fn node(&self, index: usize) -> Option<&NodeState> {
		self.nodes.get(index)
	}

	/// Current temperature; zero once settled or stopped.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Steps taken since the simulation was created.
	pub fn iteration(&self) -> u64 {
		self.iteration
	}

	/// Where the simulation is in its lifecycle.
	pub fn run_state(&self) -> RunState {
		self.state
	}

	/// Whether the next [`Simulation::step`] applies forces.
	pub fn is_running(&self) -> bool {
		self.state == RunState::Running
	}

	/// Advance one step. Returns `None` when nothing moved.
	pub fn step(&mut self) -> Option<Tick> {
		if self.state != RunState::Running {
			return None;
		}

		self.alpha *= 1.0 - self.params.alpha_decay;
		if self.alpha < self.params.alpha_min {
			self.alpha = 0.0;
			self.state = RunState::Settled;
			debug!(
				"component-graph: simulation settled after {} steps",
				self.iteration
			);
			return None;
		}

		self.apply_links();
		self.apply_gravity();
		self.apply_charge();
		self.integrate();

		self.iteration += 1;
		trace!(
			"component-graph: tick {} alpha {:.4}",
			self.iteration, self.alpha
		);
		Some(Tick {
			iteration: self.iteration,
			alpha: self.alpha,
		})
	}

	/// Reheat a running or settled simulation.
	pub fn resume(&mut self) {
		if self.state == RunState::Stopped {
			return;
		}
		self.alpha = self.alpha.max(self.params.alpha_start);
		self.state = RunState::Running;
	}

	/// Halt for good. Later calls to [`Simulation::step`] do nothing.
	pub fn stop(&mut self) {
		if self.state != RunState::Stopped {
			debug!(
				"component-graph: simulation stopped at step {}",
				self.iteration
			);
		}
		self.state = RunState::Stopped;
		self.alpha = 0.0;
	}

	/// Change the layout area. Gravity follows the new centre.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.params.width = width;
		self.params.height = height;
		self.resume();
	}

	/// Pin a node in place. Returns `false` for an unknown index.
	pub fn fix(&mut self, index: usize) -> bool {
		let Some(node) = self.nodes.get_mut(index) else {
			return false;
		};
		node.fixed = true;
		node.vx = 0.0;
		node.vy = 0.0;
		true
	}

	/// Unpin a node so the integrator moves it again.
	pub fn release(&mut self, index: usize) -> bool {
		let Some(node) = self.nodes.get_mut(index) else {
			return false;
		};
		node.fixed = false;
		true
	}

	/// Overwrite a node's position, discarding its velocity.
	pub fn place(&mut self, index: usize, x: f64, y: f64) -> bool {
		let Some(node) = self.nodes.get_mut(index) else {
			return false;
		};
		node.x = x;
		node.y = y;
		node.vx = 0.0;
		node.vy = 0.0;
		true
	}

	fn apply_links(&mut self) {
		let k = self.alpha * self.params.link_strength;
		for spring in &self.springs {
			let (s, t) = (self.nodes[spring.source], self.nodes[spring.target]);
			let mut dx = t.x + t.vx - s.x - s.vx;
			let mut dy = t.y + t.vy - s.y - s.vy;
			if dx == 0.0 && dy == 0.0 {
				(dx, dy) = jiggle(spring.source, spring.target);
			}
			let l = (dx * dx + dy * dy).sqrt();
			let f = (l - self.params.link_distance) / l * k;
			let (fx, fy) = (dx * f, dy * f);

			let target = &mut self.nodes[spring.target];
			target.vx -= fx * spring.bias;
			target.vy -= fy * spring.bias;
			let source = &mut self.nodes[spring.source];
			source.vx += fx * (1.0 - spring.bias);
			source.vy += fy * (1.0 - spring.bias);
		}
	}

	fn apply_gravity(&mut self) {
		let k = self.alpha * self.params.gravity;
		if k == 0.0 {
			return;
		}
		let (cx, cy) = self.params.center();
		for node in &mut self.nodes {
			node.vx += (cx - node.x) * k;
			node.vy += (cy - node.y) * k;
		}
	}

	fn apply_charge(&mut self) {
		let strength = self.alpha * self.params.charge;
		if strength == 0.0 {
			return;
		}
		let n = self.nodes.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let mut dx = self.nodes[j].x - self.nodes[i].x;
				let mut dy = self.nodes[j].y - self.nodes[i].y;
				if dx == 0.0 && dy == 0.0 {
					(dx, dy) = jiggle(i, j);
				}
				let l2 = (dx * dx + dy * dy).max(MIN_DISTANCE_SQ);
				let f = strength / l2;
				let (fx, fy) = (dx * f, dy * f);

				self.nodes[i].vx += fx;
				self.nodes[i].vy += fy;
				self.nodes[j].vx -= fx;
				self.nodes[j].vy -= fy;
			}
		}
	}

	fn integrate(&mut self) {
		let friction = self.params.friction;
		let (width, height, contain) = (self.params.width, self.params.height, self.params.contain);
		for node in &mut self.nodes {
			if node.fixed {
				node.vx = 0.0;
				node.vy = 0.0;
				continue;
			}
			node.vx *= friction;
			node.vy *= friction;
			node.x += node.vx;
			node.y += node.vy;

			if contain {
				if !(0.0..=width).contains(&node.x) {
					node.x = node.x.clamp(0.0, width);
					node.vx = 0.0;
				}
				if !(0.0..=height).contains(&node.y) {
					node.y = node.y.clamp(0.0, height);
					node.vy = 0.0;
				}
			}
		}
	}
}

/// Deterministic small offset separating the pair `(a, b)`.
fn jiggle(a: usize, b: usize) -> (f64, f64) {
	let seed = (a * 31 + b) as f64 + 1.0;
	let angle = pseudo_random(seed) * TAU;
	(
		JITTER_DISTANCE * angle.cos(),
		JITTER_DISTANCE * angle.sin(),
	)
}

fn pseudo_random(seed: f64) -> f64 {
	let x = (seed * 12.9898 + seed * 78.233).sin() * 43758.5453;
	x - x.floor()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::model::build;
	use crate::components::force_graph::types::{RawComponent, RawDependency};

	fn graph(edges: &[(&str, &str)], ids: &[&str]) -> ResolvedGraph {
		let raw: Vec<RawComponent> = ids
			.iter()
			.map(|id| RawComponent {
				id: (*id).into(),
				title: (*id).into(),
				depends_on: Some(
					edges
						.iter()
						.filter(|(s, _)| s == id)
						.map(|(_, t)| RawDependency {
							target: (*t).into(),
							kind: None,
						})
						.collect(),
				),
			})
			.collect();
		build(&raw).unwrap()
	}

	fn run_until_settled(sim: &mut Simulation) -> u64 {
		let mut steps = 0;
		while sim.step().is_some() {
			steps += 1;
			assert!(steps < 10_000, "simulation never settled");
		}
		steps
	}

	fn distance(a: &NodeState, b: &NodeState) -> f64 {
		((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
	}

	#[test]
	fn nodes_start_on_a_circle_around_the_centre() {
		let sim = Simulation::new(&graph(&[], &["a", "b", "c", "d"]), SimulationParameters::default());
		for node in sim.nodes() {
			let r = ((node.x - 480.0).powi(2) + (node.y - 250.0).powi(2)).sqrt();
			assert!((r - 100.0).abs() < 1e-9);
		}
	}

	#[test]
	fn cools_down_and_settles() {
		let mut sim = Simulation::new(
			&graph(&[("b", "a"), ("c", "a")], &["a", "b", "c"]),
			SimulationParameters::default(),
		);
		let steps = run_until_settled(&mut sim);
		assert!(steps > 100);
		assert_eq!(sim.run_state(), RunState::Settled);
		assert_eq!(sim.alpha(), 0.0);

		let before = sim.nodes().to_vec();
		assert!(sim.step().is_none());
		assert_eq!(sim.nodes(), before.as_slice());

		sim.resume();
		assert!(sim.is_running());
		assert!(sim.step().is_some());
	}

	#[test]
	fn spring_pulls_pair_to_link_distance() {
		let params = SimulationParameters {
			charge: 0.0,
			gravity: 0.0,
			..SimulationParameters::default()
		};
		let mut sim = Simulation::new(&graph(&[("b", "a")], &["a", "b"]), params);
		assert!((distance(&sim.nodes()[0], &sim.nodes()[1]) - 200.0).abs() < 1e-9);

		run_until_settled(&mut sim);
		let d = distance(&sim.nodes()[0], &sim.nodes()[1]);
		assert!((d - 60.0).abs() < 5.0, "distance {d}");
	}

	#[test]
	fn charge_pushes_unlinked_nodes_apart() {
		let params = SimulationParameters {
			gravity: 0.0,
			initial_radius: 10.0,
			..SimulationParameters::default()
		};
		let mut sim = Simulation::new(&graph(&[], &["a", "b"]), params);
		let start = distance(&sim.nodes()[0], &sim.nodes()[1]);
		for _ in 0..20 {
			sim.step();
		}
		assert!(distance(&sim.nodes()[0], &sim.nodes()[1]) > start);
	}

	#[test]
	fn coincident_nodes_separate_without_nan() {
		let params = SimulationParameters {
			initial_radius: 0.0,
			..SimulationParameters::default()
		};
		let mut sim = Simulation::new(&graph(&[("b", "a")], &["a", "b", "c"]), params);
		assert_eq!(sim.nodes()[0].x, sim.nodes()[1].x);
		assert_eq!(sim.nodes()[0].y, sim.nodes()[1].y);

		for _ in 0..50 {
			sim.step();
		}
		for node in sim.nodes() {
			assert!(node.x.is_finite() && node.y.is_finite());
		}
		assert!(distance(&sim.nodes()[0], &sim.nodes()[1]) > 1.0);
		assert!(distance(&sim.nodes()[0], &sim.nodes()[2]) > 1.0);
	}

	#[test]
	fn fixed_node_is_never_moved_by_the_integrator() {
		let mut sim = Simulation::new(
			&graph(&[("b", "a")], &["a", "b"]),
			SimulationParameters::default(),
		);
		assert!(sim.fix(0));
		assert!(sim.place(0, 10.0, 20.0));
		let pinned_at = distance(&sim.nodes()[0], &sim.nodes()[1]);
		for _ in 0..30 {
			sim.step();
			assert_eq!((sim.nodes()[0].x, sim.nodes()[0].y), (10.0, 20.0));
		}
		// The pinned node still pulls its neighbour.
		assert!(distance(&sim.nodes()[0], &sim.nodes()[1]) < pinned_at);

		assert!(sim.release(0));
		sim.step();
		assert_ne!((sim.nodes()[0].x, sim.nodes()[0].y), (10.0, 20.0));
	}

	#[test]
	fn unknown_indices_are_rejected() {
		let mut sim = Simulation::new(&graph(&[], &["a"]), SimulationParameters::default());
		assert!(!sim.fix(3));
		assert!(!sim.release(3));
		assert!(!sim.place(3, 0.0, 0.0));
	}

	#[test]
	fn stopped_simulation_cannot_resume() {
		let mut sim = Simulation::new(&graph(&[], &["a", "b"]), SimulationParameters::default());
		sim.stop();
		sim.resume();
		assert_eq!(sim.run_state(), RunState::Stopped);
		assert!(sim.step().is_none());
	}

	#[test]
	fn contain_keeps_nodes_inside_the_area() {
		let params = SimulationParameters {
			width: 50.0,
			height: 50.0,
			gravity: 0.0,
			contain: true,
			..SimulationParameters::default()
		};
		let mut sim = Simulation::new(&graph(&[], &["a", "b", "c", "d", "e"]), params);
		run_until_settled(&mut sim);
		for node in sim.nodes() {
			assert!((0.0..=50.0).contains(&node.x));
			assert!((0.0..=50.0).contains(&node.y));
		}
	}
}
