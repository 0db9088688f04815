//! A playable patience scene.
//!
//! `PatienceScene` owns the registry, the board and the placement engine.
//! Host input is forwarded as mouse events; `update` advances animations.
//!
//! ```
//! use patience::{BoardLayout, CardData, GameMode, NoopAnimator, PatienceRules, PatienceScene, Vec2};
//!
//! let mode = GameMode::new("klondike", PatienceRules::default(), CardData::standard_deck(13));
//! let mut scene = PatienceScene::new(mode, BoardLayout::default(), 42, NoopAnimator).unwrap();
//!
//! scene.on_mouse_moved(Vec2::new(0.0, 0.0)).unwrap();
//! scene.on_mouse_pressed().unwrap();
//! scene.on_mouse_released().unwrap();
//! assert!(!scene.is_won().unwrap());
//! ```

use tracing::info;

use crate::animation::{Animator, NoopAnimator};
use crate::cards::{CardComponent, CardSlotComponent};
use crate::core::{GameMode, GameRng, PatienceResult, Registry, Vec2};
use crate::systems::{Board, BoardLayout, PatienceSetup, PlacementEngine};

/// Board, registry and engine for one game.
#[derive(Debug)]
pub struct PatienceScene<A: Animator = NoopAnimator> {
    mode: GameMode,
    registry: Registry,
    board: Board,
    engine: PlacementEngine<A>,
}

impl<A: Animator> PatienceScene<A> {
    /// Build the board for `mode`, deal with `seed` and release any
    /// monsters the deal exposed.
    pub fn new(mode: GameMode, layout: BoardLayout, seed: u64, animator: A) -> PatienceResult<Self> {
        mode.validate()?;

        let mut registry = Registry::new();
        let board = PatienceSetup::build_board(&mut registry, &mode.rules, &mode.name, layout);

        let mut rng = GameRng::new(seed).for_context("deal");
        PatienceSetup::deal(&mut registry, &board, &mode.deck, &mut rng)?;

        let mut engine = PlacementEngine::new(board.placement_config(), animator);
        engine.init(&mut registry)?;

        info!(mode = %mode.name, seed, cards = mode.deck.len(), "scene ready");
        Ok(Self {
            mode,
            registry,
            board,
            engine,
        })
    }

    #[must_use]
    pub fn game_mode(&self) -> &GameMode {
        &self.mode
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn engine(&self) -> &PlacementEngine<A> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PlacementEngine<A> {
        &mut self.engine
    }

    pub fn on_mouse_moved(&mut self, pointer: Vec2) -> PatienceResult<()> {
        self.engine.on_pointer_moved(&mut self.registry, pointer)
    }

    /// Returns whether a card was picked up.
    pub fn on_mouse_pressed(&mut self) -> PatienceResult<bool> {
        self.engine.on_pointer_pressed(&mut self.registry)
    }

    pub fn on_mouse_released(&mut self) -> PatienceResult<()> {
        self.engine.on_pointer_released(&mut self.registry)
    }

    /// Advance animations by `dt` seconds.
    pub fn update(&mut self, dt: f32) -> PatienceResult<()> {
        self.engine.animator_mut().update(&mut self.registry, dt)
    }

    /// Won once no playing card is left in the columns, freecells or
    /// stocks. Monsters still waiting in a column do not count.
    pub fn is_won(&self) -> PatienceResult<bool> {
        let board = &self.board;
        for slot in board.columns.iter().chain(&board.freecells).chain(&board.stocks) {
            for &card in self.registry.get::<CardSlotComponent>(*slot)?.cards() {
                if !self.registry.get::<CardComponent>(card)?.is_monster() {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}
