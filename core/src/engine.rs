use core::fmt;
use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::*;

/// How long targets stay revealed at the start of a round.
pub const PREVIEW_DURATION: Duration = Duration::from_millis(1500);

/// Period of the elapsed-time refresh while a round is active.
pub const TICK_PERIOD: Duration = Duration::from_millis(500);

/// Lifecycle of a round.
///
/// Valid transitions:
/// - `Idle`/`Ended` -> `Previewing` (start_round, next_level)
/// - `Previewing` -> `Active` (preview timer elapses)
/// - `Active` -> `Ended` (last target found, or end_round)
/// - any -> `Idle` (set_difficulty)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No round yet; empty tile set.
    Idle,
    /// Targets are revealed for the player to memorize.
    Previewing,
    /// Targets are concealed and clicks count.
    Active,
    /// Round over; scoring is fixed.
    Ended,
}

impl Phase {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    pub const fn is_previewing(self) -> bool {
        matches!(self, Self::Previewing)
    }

    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    pub const fn is_ended(self) -> bool {
        matches!(self, Self::Ended)
    }

    /// A new round may only start from `Idle` or `Ended`.
    pub const fn can_start(self) -> bool {
        matches!(self, Self::Idle | Self::Ended)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Idle
    }
}

/// Outcome of a click forwarded from the presentation layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Click arrived outside `Active`, on an unknown id, or on an
    /// already-clicked tile. Defined no-op, not an error: UI events race with
    /// phase transitions.
    Ignored,
    Hit,
    Miss,
    /// The click found the last target; the round is now `Ended`.
    Finished,
}

impl ClickOutcome {
    /// Whether this outcome could have caused an update to the round.
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Outcome of a control operation (`start_round`, `end_round`, `next_level`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ControlOutcome {
    /// The operation was invalid in the current phase and changed nothing.
    Ignored,
    Changed,
}

impl ControlOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// The round engine: owns every piece of game state and every transition.
///
/// All mutation happens synchronously inside these methods, in response to a
/// user event, a timer delivery, or a direct call; the presentation layer only
/// reads snapshots and forwards events. Calls that arrive in the wrong phase
/// are no-ops by design.
pub struct RoundEngine<S: Scheduler> {
    scheduler: S,
    picker: Box<dyn TargetPicker>,
    config: RoundConfig,
    tiles: Vec<Tile>,
    phase: Phase,
    started_at: Duration,
    now: Duration,
    hit_count: TileCount,
    miss_count: TileCount,
    summary: Option<RoundSummary>,
    next_tile_id: u32,
    // Owned timer handles: dropping one cancels the timer, so no stale
    // callback can fire against a superseded round.
    preview_timer: Option<S::OneShot>,
    tick_timer: Option<S::Repeating>,
}

impl<S: Scheduler> RoundEngine<S> {
    pub fn new(scheduler: S, picker: Box<dyn TargetPicker>) -> Self {
        Self::with_config(scheduler, picker, RoundConfig::default())
    }

    pub fn with_config(scheduler: S, picker: Box<dyn TargetPicker>, config: RoundConfig) -> Self {
        let epoch = scheduler.now();
        Self {
            scheduler,
            picker,
            config,
            tiles: Vec::new(),
            phase: Phase::default(),
            started_at: epoch,
            now: epoch,
            hit_count: 0,
            miss_count: 0,
            summary: None,
            next_tile_id: 0,
            preview_timer: None,
            tick_timer: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> RoundConfig {
        self.config
    }

    pub fn difficulty(&self) -> Side {
        self.config.difficulty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn hit_count(&self) -> TileCount {
        self.hit_count
    }

    pub fn miss_count(&self) -> TileCount {
        self.miss_count
    }

    pub fn summary(&self) -> Option<&RoundSummary> {
        self.summary.as_ref()
    }

    /// Whole seconds since the round started; frozen once the round ends,
    /// zero while `Idle`.
    pub fn elapsed_secs(&self) -> u32 {
        match self.phase {
            Phase::Idle => 0,
            _ => (self.now - self.started_at).as_secs_f64().round() as u32,
        }
    }

    /// User-facing one-liner for the current phase.
    pub fn message(&self) -> String {
        match self.phase {
            Phase::Idle => "Pick a difficulty and press play".to_string(),
            Phase::Previewing => "Memorize the marked tiles".to_string(),
            Phase::Active => format!(
                "Found {} of {} targets",
                self.hit_count,
                self.config.target_count()
            ),
            Phase::Ended => self
                .summary
                .map(|summary| summary.to_string())
                .unwrap_or_default(),
        }
    }

    /// What the presentation layer should draw for `tile` right now. Targets
    /// are exposed during the preview window, and again after the round ends
    /// for targets the player never found.
    pub fn face_of(&self, tile: &Tile) -> TileFace {
        if tile.is_hit() {
            return TileFace::Hit;
        }
        if tile.is_miss() {
            return TileFace::Miss;
        }
        match self.phase {
            Phase::Previewing | Phase::Ended if tile.is_target() => TileFace::Exposed,
            _ => TileFace::Concealed,
        }
    }

    /// Forces `Idle` with a new difficulty. Any in-flight round is aborted and
    /// its timers cancelled; the player must explicitly start the next round.
    pub fn set_difficulty(&mut self, difficulty: Side) {
        self.cancel_timers();
        self.config = RoundConfig::new(difficulty);
        self.tiles.clear();
        self.hit_count = 0;
        self.miss_count = 0;
        self.summary = None;
        self.started_at = self.scheduler.now();
        self.now = self.started_at;
        self.phase = Phase::Idle;
        log::debug!(
            "difficulty set to {}: {} tiles, {} targets",
            self.config.difficulty(),
            self.config.total_tiles(),
            self.config.target_count()
        );
    }

    /// Starts a new round from `Idle` or `Ended`: rebuilds the tile set,
    /// resets scoring and the timer, and enters `Previewing`.
    ///
    /// Calls made while `Previewing` or `Active` are ignored; restarting
    /// mid-round must go through [`end_round`](Self::end_round) or
    /// [`set_difficulty`](Self::set_difficulty) first.
    pub fn start_round(&mut self) -> ControlOutcome {
        if !self.phase.can_start() {
            log::debug!("start_round ignored in {:?}", self.phase);
            return ControlOutcome::Ignored;
        }

        // cancel before scheduling, so a pending timer from the previous round
        // can never fire against this one
        self.cancel_timers();
        self.rebuild_tiles();
        self.hit_count = 0;
        self.miss_count = 0;
        self.summary = None;
        self.started_at = self.scheduler.now();
        self.now = self.started_at;
        self.phase = Phase::Previewing;
        self.preview_timer = Some(
            self.scheduler
                .once(PREVIEW_DURATION, TimerEvent::PreviewElapsed),
        );
        log::debug!(
            "round started: {} tiles, {} targets",
            self.tiles.len(),
            self.config.target_count()
        );
        ControlOutcome::Changed
    }

    /// Manually ends the active round early. Ignored in any other phase.
    pub fn end_round(&mut self) -> ControlOutcome {
        if !self.phase.is_active() {
            log::debug!("end_round ignored in {:?}", self.phase);
            return ControlOutcome::Ignored;
        }
        self.finish_round();
        ControlOutcome::Changed
    }

    /// From `Ended`, bumps the difficulty by one and starts the next round.
    pub fn next_level(&mut self) -> ControlOutcome {
        if !self.phase.is_ended() {
            log::debug!("next_level ignored in {:?}", self.phase);
            return ControlOutcome::Ignored;
        }
        self.config = self.config.next_level();
        self.start_round()
    }

    /// Handles a click forwarded by the presentation layer. Only `Active`
    /// rounds accept clicks; anything else is a defined no-op.
    pub fn click_tile(&mut self, id: TileId) -> ClickOutcome {
        if !self.phase.is_active() {
            log::trace!("click on {:?} ignored in {:?}", id, self.phase);
            return ClickOutcome::Ignored;
        }
        let Some(tile) = self.tiles.iter_mut().find(|tile| tile.id() == id) else {
            log::trace!("click on unknown tile {:?} ignored", id);
            return ClickOutcome::Ignored;
        };
        if tile.is_clicked() {
            return ClickOutcome::Ignored;
        }

        tile.mark_clicked();
        let hit = tile.is_target();
        self.recount();

        if hit && self.hit_count == self.config.target_count() {
            self.finish_round();
            ClickOutcome::Finished
        } else if hit {
            ClickOutcome::Hit
        } else {
            ClickOutcome::Miss
        }
    }

    /// Timer delivery from the scheduler's driver. Late or superseded firings
    /// are ignored.
    pub fn handle_timer(&mut self, event: TimerEvent) {
        match (event, self.phase) {
            (TimerEvent::PreviewElapsed, Phase::Previewing) => {
                self.preview_timer = None;
                self.phase = Phase::Active;
                self.tick_timer = Some(self.scheduler.repeating(TICK_PERIOD, TimerEvent::Tick));
                log::debug!("preview over, round is live");
            }
            (TimerEvent::Tick, Phase::Active) => {
                self.now = self.scheduler.now();
            }
            _ => log::trace!("ignoring {:?} in {:?}", event, self.phase),
        }
    }

    fn rebuild_tiles(&mut self) {
        let targets = self.picker.pick(self.config);
        debug_assert_eq!(
            targets.len(),
            self.config.target_count(),
            "target generation must mark exactly one target per difficulty step"
        );

        // the old set is replaced wholesale; ids keep counting up so none is
        // ever reused across rounds
        self.tiles = (0..self.config.total_tiles())
            .map(|index| {
                let id = TileId::new(self.next_tile_id);
                self.next_tile_id += 1;
                Tile::new(id, targets.contains(index))
            })
            .collect();
    }

    fn recount(&mut self) {
        self.hit_count = self.tiles.iter().filter(|tile| tile.is_hit()).count() as TileCount;
        self.miss_count = self.tiles.iter().filter(|tile| tile.is_miss()).count() as TileCount;
    }

    fn finish_round(&mut self) {
        self.cancel_timers();
        self.now = self.scheduler.now();
        self.phase = Phase::Ended;
        let summary = RoundSummary::tally(&self.tiles, self.config, self.elapsed_secs());
        log::debug!("round ended: {}", summary);
        self.summary = Some(summary);
    }

    fn cancel_timers(&mut self) {
        // handles cancel on drop, idempotently
        self.preview_timer = None;
        self.tick_timer = None;
    }
}

impl<S: Scheduler> fmt::Debug for RoundEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundEngine")
            .field("phase", &self.phase)
            .field("difficulty", &self.config.difficulty())
            .field("tiles", &self.tiles.len())
            .field("hit_count", &self.hit_count)
            .field("miss_count", &self.miss_count)
            .finish_non_exhaustive()
    }
}
