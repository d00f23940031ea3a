//! Engine driver.
//!
//! Owns the live game state between host messages: builds it from the
//! startup messages, plans the opening while the host waits, then answers
//! each frame with a move line.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::board::{GameState, Grid};
use crate::config::EngineConfig;
use crate::diag::{moves_hash, Diagnostics};
use crate::policy::make_moves;
use crate::protocol::{collect_moves, format_moves, Frame, FrameError, FrameReader, Handshake};
use crate::search::{Deadline, OpeningPlan, OpeningPlanner};

/// Errors that end a game session.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("failed to write to host: {0}")]
    Io(#[from] std::io::Error),
}

/// Live game state plus everything kept between turns.
pub struct Engine {
    config: EngineConfig,
    pub state: GameState,
    combo: Vec<usize>,
    rng: SmallRng,
    diag: Diagnostics,
}

impl Engine {
    /// Builds the pre-game state from the startup messages. The turn counter
    /// sits at -1 until the first live frame arrives.
    pub fn new(config: EngineConfig, handshake: Handshake, production: Vec<i32>, frame: Frame) -> Self {
        let grid = Arc::new(Grid::new(handshake.width, handshake.height));
        let mut state = GameState::new(grid, handshake.id);
        state.production = production;
        state.owner = frame.owner;
        state.strength = frame.strength;
        state.set_start_loc();
        state.opening = state.count_friendly() == 1;

        let rng = SmallRng::seed_from_u64(config.seed);
        Engine {
            config,
            state,
            combo: Vec::new(),
            rng,
            diag: Diagnostics::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The opening combo being followed; empty without a plan.
    pub fn combo(&self) -> &[usize] {
        &self.combo
    }

    /// Plans the opening if we start from a single cell, then reseeds the
    /// game RNG so live play starts from the same RNG state as every
    /// simulation did.
    pub fn start(&mut self, game_start: Instant) -> Option<OpeningPlan> {
        let (x, y) = self.state.grid.index_to_xy(self.state.start_loc);
        info!(
            players = self.state.count_players(),
            width = self.state.grid.width(),
            height = self.state.grid.height(),
            start = ?(x, y),
            "game start"
        );
        let nice_min = self.config.tuning.nice_min;
        info!(
            nice_min,
            excluded_pct = self.state.nice_exclude_fraction(nice_min) * 100.0,
            seed = self.config.seed,
            "tuning"
        );

        let plan = if self.state.opening {
            let deadline = Deadline::after(game_start, self.config.budget.initial());
            let plan = OpeningPlanner::new(&self.config, deadline).plan(&self.state);
            log_plan(&plan, game_start);
            self.combo = plan.combo.clone().unwrap_or_default();
            Some(plan)
        } else {
            info!("not a single-cell start; skipping opening search");
            None
        };

        self.rng = SmallRng::seed_from_u64(self.config.seed);
        plan
    }

    /// Plays one turn from `frame` and writes the move line.
    pub fn handle_turn<W: Write>(
        &mut self,
        frame: Frame,
        out: &mut W,
        turn_start: Instant,
    ) -> Result<(), EngineError> {
        self.state.owner = frame.owner;
        self.state.strength = frame.strength;
        self.state.begin_turn();

        let tuning = &self.config.tuning;
        let report = make_moves(&mut self.state, &self.combo, tuning, &mut self.rng);

        let moves = collect_moves(&self.state);
        writeln!(out, "{}", format_moves(&moves))?;
        out.flush()?;

        let turn = self.state.turn;
        if report.nice_min < tuning.nice_min && self.diag.log_once("nice_min") {
            info!(turn, nice_min = report.nice_min, "nice minimum reduced");
        }
        if let Some(stop) = report.opening_stop {
            info!(turn, %stop, "opening fingers stopped");
        }
        if !self.state.opening && self.diag.log_once("opening_over") {
            info!(turn, "opening over");
        }

        self.diag.overallocation(&self.state);

        let elapsed = turn_start.elapsed();
        self.diag.record_ponder(turn, elapsed);
        if elapsed >= self.config.budget.turn() {
            warn!(turn, ?elapsed, "turn budget exceeded");
        }
        debug!(turn, moves = moves.len(), hash = %moves_hash(&self.state), "moves sent");

        self.diag.outlook(&self.state);
        Ok(())
    }
}

fn log_plan(plan: &OpeningPlan, game_start: Instant) {
    if plan.aborted {
        warn!("opening search aborted on the deadline");
    }
    info!(
        method = ?plan.method,
        positions = plan.positions,
        lookahead = plan.lookahead,
        elapsed = ?game_start.elapsed(),
        "opening search done"
    );
    match &plan.combo {
        Some(combo) => info!(?combo, score = plan.best.score, baseline = ?plan.baseline, "using combo"),
        None => info!(
            combo = ?plan.best.combo,
            score = plan.best.score,
            baseline = ?plan.baseline,
            "not using combo"
        ),
    }
}

/// Runs a full session: startup messages, planning, name announcement, then
/// one move line per frame until the host closes the input.
pub fn run<R: BufRead, W: Write>(input: R, out: &mut W, config: EngineConfig) -> Result<(), EngineError> {
    let mut reader = FrameReader::new(input);

    let handshake = reader.read_handshake()?;
    let game_start = Instant::now();
    let size = handshake.size();
    let production = reader.read_production(size)?;
    let frame = reader
        .read_frame(size)?
        .ok_or(FrameError::UnexpectedEof("initial frame"))?;

    let mut engine = Engine::new(config, handshake, production, frame);
    engine.start(game_start);

    writeln!(out, "{}", engine.config().name)?;
    out.flush()?;

    while let Some(frame) = reader.read_frame(size)? {
        let turn_start = Instant::now();
        engine.handle_turn(frame, out, turn_start)?;
    }

    info!(turn = engine.state.turn, "host closed the stream");
    Ok(())
}
