//! The playing field
//!
//! Owns the physics world, the entity table, the grid and the rules, and
//! drives them one tick at a time. Every tick runs strictly in order:
//! integrate, detect, resolve contacts, reconcile snapped cells (cascade,
//! clusters, falling), refresh the loaded projectiles, then check for the
//! end of the game.

use std::collections::{BTreeMap, HashSet, VecDeque};

use glam::DVec2;

use super::dispenser::Dispenser;
use super::events::{EventSink, GameEvent, GameOutcome, Listeners, LossReason};
use super::logic::GameLogic;
use super::score::Scoreboard;
use crate::config::GameConfig;
use crate::error::{ConfigError, FireError};
use crate::grid::{BubbleColor, Cell, CellKind, Grid, GridGeometry, GridPos, HexLayout};
use crate::physics::{
    Body, BodyId, BodyOwners, Collision, CollisionKind, EntityId, PhysicsWorld, elastic_exchange,
    reflect_horizontal, separate_circles,
};
use crate::{angle_from_vertical, direction_or};

/// Entity that owns the bounding edge loop
const BOUNDS: EntityId = EntityId(0);

#[derive(Debug, Clone, Copy)]
struct Entity {
    position: DVec2,
    body: Option<BodyId>,
    kind: CellKind,
}

/// Entity positions, the source of truth for every body's placement
#[derive(Debug, Default)]
struct Entities {
    next_id: u32,
    table: BTreeMap<EntityId, Entity>,
    /// Position changes not yet delivered to listeners
    moved: Vec<GameEvent>,
}

impl Entities {
    fn spawn(&mut self, kind: CellKind, position: DVec2) -> EntityId {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        self.table.insert(
            id,
            Entity {
                position,
                body: None,
                kind,
            },
        );
        id
    }

    fn get(&self, id: EntityId) -> Option<&Entity> {
        self.table.get(&id)
    }

    fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.table.get_mut(&id)
    }

    fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.table.remove(&id)
    }
}

impl BodyOwners for Entities {
    fn position(&self, owner: EntityId) -> Option<DVec2> {
        if owner == BOUNDS {
            return Some(DVec2::ZERO);
        }
        self.table.get(&owner).map(|e| e.position)
    }

    fn set_position(&mut self, owner: EntityId, position: DVec2) {
        if let Some(entity) = self.table.get_mut(&owner) {
            entity.position = position;
            self.moved.push(GameEvent::Moved {
                entity: owner,
                position,
            });
        }
    }
}

/// Scoreboard first, then the registered listeners
#[derive(Debug, Default)]
struct Emitter {
    score: Scoreboard,
    listeners: Listeners,
}

impl EventSink for Emitter {
    fn on_event(&mut self, event: &GameEvent) {
        self.score.on_event(event);
        self.listeners.on_event(event);
    }
}

/// A projectile waiting in the cannon or the next-shot slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Loaded {
    pub entity: EntityId,
    pub color: BubbleColor,
}

/// A bubble shooter level in play
#[derive(Debug)]
pub struct Scene {
    config: GameConfig,
    layout: HexLayout,
    collision_radius: f64,
    world: PhysicsWorld,
    entities: Entities,
    grid: Grid,
    logic: GameLogic,
    dispenser: Dispenser,
    /// Cannon first, then the next shot
    loaded: VecDeque<Loaded>,
    emitter: Emitter,
    outcome: Option<GameOutcome>,
    /// GameOver has been emitted
    announced: bool,
    ticks: u64,
}

impl Scene {
    /// Set up a level from a pre-filled grid.
    ///
    /// Every bubble gets a resting body, bubbles not hanging from the top row
    /// are dropped, and two projectiles are loaded.
    pub fn new(config: GameConfig, grid: Grid) -> Result<Self, ConfigError> {
        config.validate()?;
        if grid.rows() != config.rows || grid.cols_even() != config.columns {
            return Err(ConfigError::Invalid {
                field: "rows",
                reason: format!(
                    "grid is {}x{} but config expects {}x{}",
                    grid.rows(),
                    grid.cols_even(),
                    config.rows,
                    config.columns
                ),
            });
        }

        let layout = HexLayout::fit_width(config.scene_width, config.rows, config.columns);
        let mut world = PhysicsWorld::new();
        world.register(Body::edge_loop(
            DVec2::ZERO,
            DVec2::new(config.scene_width, config.scene_height),
            BOUNDS,
        ));

        let mut scene = Self {
            collision_radius: config.collision_radius(),
            logic: GameLogic::from_config(&config),
            dispenser: Dispenser::from_config(&config),
            config,
            layout,
            world,
            entities: Entities::default(),
            grid,
            loaded: VecDeque::with_capacity(2),
            emitter: Emitter::default(),
            outcome: None,
            announced: false,
            ticks: 0,
        };

        let placed: Vec<(GridPos, Cell)> = scene.grid.occupied().map(|(p, c)| (p, *c)).collect();
        for (pos, cell) in placed {
            let Some(center) = scene.layout.cell_to_pixel(pos) else {
                continue;
            };
            let id = scene.entities.spawn(cell.kind, center);
            scene.attach_body(id);
            scene.grid.set(pos, Some(Cell::with_entity(cell.kind, id)));
        }

        // Loose bubbles in a designed level just vanish, unannounced and unscored
        let dropped = scene.logic.remove_unattached(&mut scene.grid, &mut Vec::<GameEvent>::new());
        if !dropped.is_empty() {
            log::debug!("dropped {} loose bubbles from the level", dropped.len());
        }
        for removal in dropped {
            if let Some(entity) = removal.cell.entity {
                scene.remove_entity(entity);
            }
        }

        scene.refill();
        scene.evaluate();
        match scene.shots_left() {
            Some(shots) => log::info!("level start: {} bubbles, {shots} shots", scene.grid.len()),
            None => log::info!("level start: {} bubbles, unlimited shots", scene.grid.len()),
        }
        Ok(scene)
    }

    /// Register a listener for every event from now on
    pub fn add_listener(&mut self, sink: Box<dyn EventSink>) {
        self.emitter.listeners.add(sink);
    }

    /// Launch the cannon projectile toward `target`
    pub fn fire(&mut self, target: DVec2) -> Result<EntityId, FireError> {
        if self.outcome.is_some() {
            return Err(FireError::GameOver);
        }
        let offset = target - self.cannon_position();
        let angle = angle_from_vertical(offset);
        let max = self.config.max_fire_angle;
        if !(angle > -max && angle < max) {
            return Err(FireError::OutsideCone { angle, max });
        }
        let Some(shot) = self.loaded.pop_front() else {
            return Err(FireError::Empty);
        };

        let velocity = direction_or(offset, DVec2::NEG_Y) * self.config.projectile_speed;
        self.launch(shot.entity, velocity);
        log::debug!("fired {:?} at {:.3} rad", shot.color, angle);

        // Next shot moves into the cannon
        if let Some(next) = self.loaded.front().copied() {
            let cannon = self.cannon_position();
            self.entities.set_position(next.entity, cannon);
            self.flush_moves();
        }
        self.refill();
        Ok(shot.entity)
    }

    /// Advance the simulation by one tick
    pub fn step(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        self.ticks += 1;

        let collisions = self.world.step(&mut self.entities);
        self.flush_moves();

        let mut snapped: Vec<(GridPos, Cell)> = Vec::new();
        let mut bounced: HashSet<(BodyId, BodyId)> = HashSet::new();
        for collision in collisions {
            self.resolve(collision, &mut snapped, &mut bounced);
            if self.outcome.is_some() {
                break;
            }
        }
        self.flush_moves();

        if !snapped.is_empty() && self.outcome.is_none() {
            for (pos, cell) in snapped {
                self.reconcile(pos, cell);
            }
            self.swap_stale();
        }
        self.evaluate();
    }

    /// Run one frame worth of ticks, stopping early at the end of the game
    pub fn run_frame(&mut self) {
        for _ in 0..self.config.steps_per_frame {
            if self.is_over() {
                break;
            }
            self.step();
        }
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn layout(&self) -> &HexLayout {
        &self.layout
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.emitter.score
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Loaded projectiles, cannon first
    pub fn loaded(&self) -> impl Iterator<Item = &Loaded> {
        self.loaded.iter()
    }

    /// Shots not yet fired (None = unlimited)
    pub fn shots_left(&self) -> Option<u32> {
        self.dispenser
            .shots_left()
            .map(|n| n + self.loaded.len() as u32)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whole seconds left on the clock (None = untimed)
    pub fn time_left(&self) -> Option<u32> {
        let limit = self.config.time_limit_ticks()?;
        let secs = limit.saturating_sub(self.ticks) / self.config.ticks_per_second();
        Some(u32::try_from(secs).unwrap_or(u32::MAX))
    }

    fn is_out_of_time(&self) -> bool {
        self.config
            .time_limit_ticks()
            .is_some_and(|limit| self.ticks >= limit)
    }

    pub fn position(&self, entity: EntityId) -> Option<DVec2> {
        self.entities.get(entity).map(|e| e.position)
    }

    pub fn velocity(&self, entity: EntityId) -> Option<DVec2> {
        let body = self.body_of(entity)?;
        self.world.get(body).map(Body::velocity)
    }

    /// Whether any projectile is still flying
    pub fn is_settled(&self) -> bool {
        !self.world.has_moving_bodies()
    }

    /// Where the cannon holds the next projectile
    pub fn cannon_position(&self) -> DVec2 {
        DVec2::new(
            self.config.scene_width / 2.0,
            self.config.scene_height - self.layout.diameter,
        )
    }

    /// Where the projectile after the next one waits
    pub fn next_slot_position(&self) -> DVec2 {
        self.cannon_position() + DVec2::new(-2.0 * self.layout.diameter, self.layout.radius())
    }

    fn resolve(
        &mut self,
        collision: Collision,
        snapped: &mut Vec<(GridPos, Cell)>,
        bounced: &mut HashSet<(BodyId, BodyId)>,
    ) {
        // An earlier contact this tick may have snapped or removed the body
        let Some(body) = self.world.get(collision.first) else {
            return;
        };
        if body.is_resting() {
            return;
        }
        let owner = body.owner;
        let velocity = body.velocity();

        match collision.kind {
            CollisionKind::CircleCircle => {
                let Some(other) = self.world.get(collision.second) else {
                    return;
                };
                let pair = (collision.first, collision.second);
                if other.is_resting() {
                    self.snap(collision.first, owner, snapped);
                } else if !bounced.contains(&(pair.1, pair.0)) && bounced.insert(pair) {
                    // Both orderings of a moving pair are reported; bounce once
                    self.bounce_apart(pair.0, pair.1);
                }
            }
            CollisionKind::CircleTopEdge => self.snap(collision.first, owner, snapped),
            CollisionKind::CircleLeftEdge | CollisionKind::CircleRightEdge => {
                let heading_out = match collision.kind {
                    CollisionKind::CircleLeftEdge => velocity.x < 0.0,
                    _ => velocity.x > 0.0,
                };
                if heading_out {
                    if let Some(body) = self.world.get_mut(collision.first) {
                        body.set_velocity(reflect_horizontal(velocity));
                    }
                }
            }
            CollisionKind::CircleBottomEdge => {
                log::debug!("{owner:?} dropped out of the bottom");
                self.remove_entity(owner);
            }
        }
    }

    fn bounce_apart(&mut self, first: BodyId, second: BodyId) {
        let (Some(a), Some(b)) = (self.world.get(first), self.world.get(second)) else {
            return;
        };
        let (owner_a, owner_b) = (a.owner, b.owner);
        let (vel_a, vel_b) = (a.velocity(), b.velocity());
        let (Some(ra), Some(rb)) = (a.shape.radius(), b.shape.radius()) else {
            return;
        };
        let (Some(pos_a), Some(pos_b)) = (
            self.entities.position(owner_a),
            self.entities.position(owner_b),
        ) else {
            return;
        };

        let (new_a, new_b) = separate_circles(pos_a, ra, pos_b, rb);
        self.entities.set_position(owner_a, new_a);
        self.entities.set_position(owner_b, new_b);

        let (vel_a, vel_b) = elastic_exchange(new_a, vel_a, new_b, vel_b);
        if let Some(body) = self.world.get_mut(first) {
            body.set_velocity(vel_a);
        }
        if let Some(body) = self.world.get_mut(second) {
            body.set_velocity(vel_b);
        }
    }

    /// Bring a moving projectile to rest in the nearest free cell
    fn snap(&mut self, body: BodyId, owner: EntityId, snapped: &mut Vec<(GridPos, Cell)>) {
        let Some(entity) = self.entities.get(owner).copied() else {
            return;
        };
        let taken = |grid: &Grid, pos: GridPos| {
            grid.is_occupied(pos) || snapped.iter().any(|(p, _)| *p == pos)
        };

        let Some(pos) = self.snap_target(entity.position, taken) else {
            log::info!("no cell left for {owner:?} at {:?}", entity.position);
            self.remove_entity(owner);
            self.outcome = Some(GameOutcome::Lost(LossReason::NoSnapLocation));
            return;
        };
        let Some(center) = self.layout.cell_to_pixel(pos) else {
            return;
        };

        self.entities.set_position(owner, center);
        if let Some(body) = self.world.get_mut(body) {
            body.set_resting(true);
        }
        log::debug!("{owner:?} snapped to {pos:?}");
        snapped.push((pos, Cell::with_entity(entity.kind, owner)));
    }

    /// First free cell under the candidate points: the center, then one
    /// radius right, then one radius left. When every candidate lands on an
    /// occupied cell, the free neighbor of the first one nearest to `at`.
    fn snap_target(&self, at: DVec2, taken: impl Fn(&Grid, GridPos) -> bool) -> Option<GridPos> {
        let r = self.layout.radius();
        let candidates: Vec<GridPos> = [at, at + DVec2::new(r, 0.0), at - DVec2::new(r, 0.0)]
            .into_iter()
            .filter_map(|p| self.layout.pixel_to_cell(p))
            .collect();

        if let Some(&free) = candidates.iter().find(|&&p| !taken(&self.grid, p)) {
            return Some(free);
        }

        let blocked = *candidates.first()?;
        log::warn!("snap candidates for {at:?} all occupied, trying around {blocked:?}");
        self.grid
            .neighbor_positions(blocked)
            .filter(|&p| !taken(&self.grid, p))
            .filter_map(|p| self.layout.cell_to_pixel(p).map(|c| (p, c.distance_squared(at))))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(p, _)| p)
    }

    fn reconcile(&mut self, pos: GridPos, cell: Cell) {
        let result = self
            .logic
            .handle_snapped(&mut self.grid, pos, cell, &mut self.emitter);
        for removal in result.removals {
            if let Some(entity) = removal.cell.entity {
                self.remove_entity(entity);
            }
        }
    }

    /// Replace loaded projectiles whose color has left the grid
    fn swap_stale(&mut self) {
        if !self.grid.has_normal_cells() {
            return;
        }
        for slot in 0..self.loaded.len() {
            let Some(shot) = self.loaded.get(slot).copied() else {
                continue;
            };
            if self.grid.is_kind_in_grid(CellKind::Normal(shot.color)) {
                continue;
            }
            let color = self.dispenser.replacement(&self.grid);
            log::debug!("swapping loaded {:?} for {color:?}", shot.color);
            self.remove_entity(shot.entity);
            let position = self.slot_position(slot);
            let entity = self.spawn_loaded(color, position);
            self.loaded[slot] = Loaded { entity, color };
        }
    }

    /// Top the loaded queue back up to two
    fn refill(&mut self) {
        while self.loaded.len() < 2 {
            let Some(color) = self.dispenser.next(&self.grid) else {
                break;
            };
            let position = self.slot_position(self.loaded.len());
            let entity = self.spawn_loaded(color, position);
            self.loaded.push_back(Loaded { entity, color });
        }
    }

    fn slot_position(&self, slot: usize) -> DVec2 {
        if slot == 0 {
            self.cannon_position()
        } else {
            self.next_slot_position()
        }
    }

    fn spawn_loaded(&mut self, color: BubbleColor, position: DVec2) -> EntityId {
        let kind = CellKind::Normal(color);
        let entity = self.entities.spawn(kind, position);
        self.emitter.on_event(&GameEvent::Loaded { entity, kind });
        entity
    }

    /// Give `entity` a collision body (resting until launched)
    fn attach_body(&mut self, entity: EntityId) {
        let body = self
            .world
            .register(Body::circle(self.collision_radius, entity));
        if let Some(e) = self.entities.get_mut(entity) {
            e.body = Some(body);
        }
    }

    fn launch(&mut self, entity: EntityId, velocity: DVec2) {
        if self.body_of(entity).is_none() {
            self.attach_body(entity);
        }
        if let Some(body) = self.body_of(entity).and_then(|b| self.world.get_mut(b)) {
            body.set_velocity(velocity);
        }
        self.emitter.on_event(&GameEvent::Fired { entity, velocity });
    }

    fn body_of(&self, entity: EntityId) -> Option<BodyId> {
        self.entities.get(entity).and_then(|e| e.body)
    }

    fn remove_entity(&mut self, entity: EntityId) {
        let Some(removed) = self.entities.remove(entity) else {
            return;
        };
        if let Some(body) = removed.body {
            self.world.deregister(body);
        }
        self.emitter.on_event(&GameEvent::Removed { entity });
    }

    fn flush_moves(&mut self) {
        for event in std::mem::take(&mut self.entities.moved) {
            self.emitter.on_event(&event);
        }
    }

    fn evaluate(&mut self) {
        if self.announced {
            return;
        }
        let outcome = match self.outcome {
            Some(outcome) => outcome,
            None if GameLogic::is_won(&self.grid) => GameOutcome::Won,
            None if self.is_out_of_time() => GameOutcome::Lost(LossReason::OutOfTime),
            None if self.loaded.is_empty() && self.is_settled() => {
                GameOutcome::Lost(LossReason::OutOfShots)
            }
            None => return,
        };
        // Leftover shots and seconds pay out whether the game was won or lost
        if let Some(shots) = self.shots_left() {
            let per_shot = self.config.shot_bonus();
            self.emitter.score.apply_shot_bonus(shots, per_shot);
        }
        if let Some(secs) = self.time_left() {
            let per_second = self.config.time_bonus();
            self.emitter.score.apply_time_bonus(secs, per_second);
        }
        self.outcome = Some(outcome);
        self.announced = true;
        log::info!(
            "game over after {} ticks: {:?}, score {}",
            self.ticks,
            outcome,
            self.emitter.score.score
        );
        self.emitter.on_event(&GameEvent::GameOver { outcome });
    }
}
