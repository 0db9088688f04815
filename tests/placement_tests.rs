//! Placement engine integration tests.
//!
//! Boards are built with `PatienceSetup` and cards are placed by hand so
//! every test controls the exact stacking. Default layout: columns on row
//! 0 at x = 0, 60, ...; sites on row 1 (y = 100); monster bays on row 2
//! (y = 200); freecells follow the sites on row 1.

use patience::animation::{
    Animator, NoopAnimator, RecordingAnimator, SpriteComponent, CARD_BACK_SPRITE, MONSTER_BACK_SPRITE,
};
use patience::cards::{CardComponent, CardSlotComponent, RankOrdering, Suit, SuitOrdering};
use patience::core::{EntityId, PatienceRules, Registry, Revelation, Vec2, Vec3};
use patience::spatial::{BoxArea2D, TransformComponent};
use patience::systems::{
    layout_slot, Board, BoardLayout, PatienceSetup, PlacementEngine, PlacementIntent, PlacementOutcome, RevertReason,
};

// =============================================================================
// Helpers
// =============================================================================

fn table(rules: PatienceRules) -> (Registry, Board) {
    let mut registry = Registry::new();
    let board = PatienceSetup::build_board(&mut registry, &rules, "test", BoardLayout::default());
    (registry, board)
}

fn spawn(registry: &mut Registry, board: &Board, card: CardComponent) -> EntityId {
    let slot = card.current_slot();
    let entity = registry.create_entity(card.to_string());
    registry.add(entity, card);
    registry.add(entity, TransformComponent::default());
    registry.add(entity, BoxArea2D::new(board.layout.card_half_extent));
    registry.add(entity, SpriteComponent::new("face.png"));
    registry.get_mut::<CardSlotComponent>(slot).unwrap().add_card(entity);
    layout_slot(registry, slot).unwrap();
    entity
}

fn card(registry: &mut Registry, board: &Board, slot: EntityId, rank: u8, suit: Suit) -> EntityId {
    spawn(registry, board, CardComponent::new(rank, suit, slot))
}

fn monster(registry: &mut Registry, board: &Board, slot: EntityId, health: u32) -> EntityId {
    spawn(registry, board, CardComponent::monster(1, Suit::Spades, health, slot))
}

fn drag<A: Animator>(engine: &mut PlacementEngine<A>, registry: &mut Registry, from: Vec2, to: Vec2) {
    engine.on_pointer_moved(registry, from).unwrap();
    engine.on_pointer_pressed(registry).unwrap();
    engine.on_pointer_moved(registry, to).unwrap();
    engine.on_pointer_released(registry).unwrap();
}

fn cards_of(registry: &Registry, slot: EntityId) -> Vec<EntityId> {
    registry.get::<CardSlotComponent>(slot).unwrap().cards().to_vec()
}

fn slot_of(registry: &Registry, card: EntityId) -> EntityId {
    registry.get::<CardComponent>(card).unwrap().current_slot()
}

fn position(registry: &Registry, card: EntityId) -> Vec3 {
    registry.get::<TransformComponent>(card).unwrap().position
}

fn descending_rules() -> PatienceRules {
    PatienceRules::default()
        .with_columns(2)
        .with_sites(1)
        .with_packing(RankOrdering::Descending, SuitOrdering::Any)
}

// =============================================================================
// Pick-up
// =============================================================================

/// Pressing on a card lifts the packed run above it.
#[test]
fn test_press_lifts_packed_sequence() {
    let (mut registry, board) = table(descending_rules());
    let column = board.columns[0];
    let five = card(&mut registry, &board, column, 5, Suit::Clubs);
    let three = card(&mut registry, &board, column, 3, Suit::Diamonds);
    let mut engine = PlacementEngine::headless(board.placement_config());

    // Inside the 5 but below the 3.
    engine.on_pointer_moved(&mut registry, Vec2::new(0.0, 25.0)).unwrap();
    assert_eq!(engine.hovered_card(&registry).unwrap(), Some(five));
    assert!(engine.on_pointer_pressed(&mut registry).unwrap());

    let stagger = board.layout.stagger_offset;
    let five_component = registry.get::<CardComponent>(five).unwrap();
    let three_component = registry.get::<CardComponent>(three).unwrap();
    assert!(five_component.is_held());
    assert!(three_component.is_held());
    assert_eq!(five_component.held_offset(), Vec2::ZERO);
    assert_eq!(three_component.held_offset(), stagger);
}

/// A card under a broken run cannot be lifted.
#[test]
fn test_press_refuses_broken_sequence() {
    let (mut registry, board) = table(descending_rules());
    let column = board.columns[0];
    let low = card(&mut registry, &board, column, 3, Suit::Clubs);
    card(&mut registry, &board, column, 5, Suit::Diamonds);
    let mut engine = PlacementEngine::headless(board.placement_config());

    assert!(!engine.can_be_held(&registry, low).unwrap());
    engine.on_pointer_moved(&mut registry, Vec2::new(0.0, 25.0)).unwrap();
    assert!(!engine.on_pointer_pressed(&mut registry).unwrap());
    assert!(engine.held_cards(&registry).unwrap().is_empty());
}

/// Face-down cards are not picked up.
#[test]
fn test_press_ignores_unavailable_card() {
    let (mut registry, board) = table(descending_rules());
    let column = board.columns[0];
    let hidden = card(&mut registry, &board, column, 5, Suit::Clubs);
    registry.get_mut::<CardComponent>(hidden).unwrap().available = false;
    let mut engine = PlacementEngine::headless(board.placement_config());

    engine.on_pointer_moved(&mut registry, Vec2::ZERO).unwrap();
    assert!(!engine.on_pointer_pressed(&mut registry).unwrap());
}

/// Sites and bays never give cards back.
#[test]
fn test_press_ignores_site_cards() {
    let (mut registry, board) = table(descending_rules());
    let site = board.sites[0];
    let built = card(&mut registry, &board, site, 5, Suit::Clubs);
    let mut engine = PlacementEngine::headless(board.placement_config());

    assert!(!engine.can_be_held(&registry, built).unwrap());
    engine.on_pointer_moved(&mut registry, Vec2::new(0.0, 100.0)).unwrap();
    assert!(!engine.on_pointer_pressed(&mut registry).unwrap());
}

// =============================================================================
// Drops
// =============================================================================

/// A whole sequence moves onto an empty column in order.
#[test]
fn test_sequence_moves_to_empty_column() {
    let (mut registry, board) = table(descending_rules());
    let (left, right) = (board.columns[0], board.columns[1]);
    let five = card(&mut registry, &board, left, 5, Suit::Clubs);
    let three = card(&mut registry, &board, left, 3, Suit::Diamonds);
    let mut engine = PlacementEngine::headless(board.placement_config());

    drag(&mut engine, &mut registry, Vec2::new(0.0, 25.0), Vec2::new(60.0, 25.0));

    assert!(cards_of(&registry, left).is_empty());
    assert_eq!(cards_of(&registry, right), vec![five, three]);
    assert_eq!(slot_of(&registry, three), right);
    assert_eq!(position(&registry, three).truncate(), Vec2::new(60.0, -20.0));
    assert!(engine.held_cards(&registry).unwrap().is_empty());
}

/// Dropping where the packing rule fails reverts to the exact position.
#[test]
fn test_rule_violation_reverts() {
    let rules = PatienceRules::default().with_columns(2).with_sites(1);
    let (mut registry, board) = table(rules);
    let (left, right) = (board.columns[0], board.columns[1]);
    let moving = card(&mut registry, &board, left, 7, Suit::Hearts);
    card(&mut registry, &board, right, 9, Suit::Clubs);
    let before = position(&registry, moving);
    let mut engine = PlacementEngine::headless(board.placement_config());

    drag(&mut engine, &mut registry, Vec2::ZERO, Vec2::new(60.0, 0.0));

    assert_eq!(slot_of(&registry, moving), left);
    assert_eq!(position(&registry, moving), before);
    assert_eq!(cards_of(&registry, right).len(), 1);
}

/// Descending-by-one, alternate colour packing accepts the right card.
#[test]
fn test_default_packing_accepts() {
    let rules = PatienceRules::default().with_columns(2).with_sites(1);
    let (mut registry, board) = table(rules);
    let (left, right) = (board.columns[0], board.columns[1]);
    let moving = card(&mut registry, &board, left, 8, Suit::Hearts);
    let nine = card(&mut registry, &board, right, 9, Suit::Clubs);
    let mut engine = PlacementEngine::headless(board.placement_config());

    drag(&mut engine, &mut registry, Vec2::ZERO, Vec2::new(60.0, 0.0));

    assert_eq!(cards_of(&registry, right), vec![nine, moving]);
    assert_eq!(position(&registry, moving).truncate(), Vec2::new(60.0, -20.0));
}

/// Player drops onto discard piles and monster bays are refused.
#[test]
fn test_reserved_slots_refuse_player() {
    let (mut registry, board) = table(descending_rules());
    let moving = card(&mut registry, &board, board.columns[0], 5, Suit::Clubs);
    let mut engine = PlacementEngine::headless(board.placement_config());
    let player = PlacementIntent::Player { in_sequence: false };

    assert_eq!(
        engine.place_card(&mut registry, moving, board.main_discard, player).unwrap(),
        PlacementOutcome::Reverted(RevertReason::DiscardOnly)
    );
    assert_eq!(
        engine.place_card(&mut registry, moving, board.monster_bays[0], player).unwrap(),
        PlacementOutcome::Reverted(RevertReason::ReleaseOnly)
    );
    assert_eq!(slot_of(&registry, moving), board.columns[0]);
}

/// A freecell holds one card.
#[test]
fn test_freecell_capacity() {
    let rules = descending_rules().with_freecells(1);
    let (mut registry, board) = table(rules);
    let freecell = board.freecells[0];
    let first = card(&mut registry, &board, board.columns[0], 5, Suit::Clubs);
    let second = card(&mut registry, &board, board.columns[1], 6, Suit::Clubs);
    let mut engine = PlacementEngine::headless(board.placement_config());
    let player = PlacementIntent::Player { in_sequence: false };

    assert!(engine.place_card(&mut registry, first, freecell, player).unwrap().is_placed());
    assert_eq!(
        engine.place_card(&mut registry, second, freecell, player).unwrap(),
        PlacementOutcome::Reverted(RevertReason::SlotFull)
    );
}

/// Under top-only revelation the card under a moved card turns face-up.
#[test]
fn test_moving_top_card_reveals_next() {
    let rules = descending_rules().with_revelation(Revelation::TopOnly);
    let (mut registry, board) = table(rules);
    let left = board.columns[0];
    let hidden = card(&mut registry, &board, left, 9, Suit::Clubs);
    registry.get_mut::<CardComponent>(hidden).unwrap().available = false;
    let top = card(&mut registry, &board, left, 4, Suit::Hearts);
    let mut engine = PlacementEngine::headless(board.placement_config());

    // Point inside the top card only.
    drag(&mut engine, &mut registry, Vec2::new(0.0, -45.0), Vec2::new(60.0, -45.0));

    assert_eq!(slot_of(&registry, top), board.columns[1]);
    assert!(registry.get::<CardComponent>(hidden).unwrap().available);
}

// =============================================================================
// Monster battles
// =============================================================================

/// Not enough rank: the card reverts and the monster stays.
#[test]
fn test_insufficient_damage_reverts() {
    let (mut registry, board) = table(descending_rules());
    let (site, bay) = (board.sites[0], board.monster_bays[0]);
    let ogre = monster(&mut registry, &board, bay, 7);
    let four = card(&mut registry, &board, board.columns[1], 4, Suit::Hearts);
    let before = position(&registry, four);
    let mut engine = PlacementEngine::new(board.placement_config(), RecordingAnimator::new());

    drag(&mut engine, &mut registry, Vec2::new(60.0, 0.0), Vec2::new(0.0, 100.0));

    assert_eq!(slot_of(&registry, four), board.columns[1]);
    assert_eq!(position(&registry, four), before);
    assert_eq!(cards_of(&registry, bay), vec![ogre]);
    assert!(cards_of(&registry, site).is_empty());
    assert!(engine.animator().requests().is_empty());
}

/// Enough rank: the monster and the site's cards are discarded.
#[test]
fn test_sufficient_damage_defeats_monster() {
    let (mut registry, board) = table(descending_rules());
    let (site, bay) = (board.sites[0], board.monster_bays[0]);
    let ogre = monster(&mut registry, &board, bay, 7);
    let seven = card(&mut registry, &board, board.columns[1], 7, Suit::Hearts);
    let mut engine = PlacementEngine::new(board.placement_config(), RecordingAnimator::new());

    drag(&mut engine, &mut registry, Vec2::new(60.0, 0.0), Vec2::new(0.0, 100.0));

    assert!(cards_of(&registry, bay).is_empty());
    assert!(cards_of(&registry, site).is_empty());
    assert_eq!(cards_of(&registry, board.main_discard), vec![seven]);
    assert_eq!(cards_of(&registry, board.monster_discard), vec![ogre]);

    let requests = engine.animator().requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].entity, ogre);
    assert_eq!(requests[0].flip_sprite(), Some(MONSTER_BACK_SPRITE));
    assert_eq!(requests[1].entity, seven);
    assert_eq!(requests[1].flip_sprite(), Some(CARD_BACK_SPRITE));
    assert_eq!(requests[1].to, position(&registry, seven));
}

/// Cards already at the site count towards the attack.
#[test]
fn test_site_damage_accumulates() {
    let (mut registry, board) = table(descending_rules());
    let (site, bay) = (board.sites[0], board.monster_bays[0]);
    monster(&mut registry, &board, bay, 7);
    let standing = card(&mut registry, &board, site, 3, Suit::Clubs);
    let four = card(&mut registry, &board, board.columns[1], 4, Suit::Hearts);
    let mut engine = PlacementEngine::headless(board.placement_config());

    drag(&mut engine, &mut registry, Vec2::new(60.0, 0.0), Vec2::new(0.0, 100.0));

    assert!(cards_of(&registry, bay).is_empty());
    assert_eq!(cards_of(&registry, board.main_discard), vec![four, standing]);
}

/// A lifted run attacks with its combined rank even when no single card
/// could win alone.
#[test]
fn test_sequence_attack_defeats_monster() {
    let (mut registry, board) = table(descending_rules());
    let (site, bay) = (board.sites[0], board.monster_bays[0]);
    let ogre = monster(&mut registry, &board, bay, 8);
    let five = card(&mut registry, &board, board.columns[1], 5, Suit::Clubs);
    let three = card(&mut registry, &board, board.columns[1], 3, Suit::Hearts);
    let mut engine = PlacementEngine::headless(board.placement_config());

    // Inside the 5 but below the 3.
    drag(&mut engine, &mut registry, Vec2::new(60.0, 25.0), Vec2::new(0.0, 125.0));

    assert!(cards_of(&registry, bay).is_empty());
    assert!(cards_of(&registry, site).is_empty());
    assert!(cards_of(&registry, board.columns[1]).is_empty());
    assert_eq!(cards_of(&registry, board.main_discard), vec![three, five]);
    assert_eq!(cards_of(&registry, board.monster_discard), vec![ogre]);
}

/// When the combined rank still falls short, the whole run goes back.
#[test]
fn test_sequence_attack_too_weak_reverts_all() {
    let (mut registry, board) = table(descending_rules());
    let (site, bay) = (board.sites[0], board.monster_bays[0]);
    let ogre = monster(&mut registry, &board, bay, 9);
    let five = card(&mut registry, &board, board.columns[1], 5, Suit::Clubs);
    let three = card(&mut registry, &board, board.columns[1], 3, Suit::Hearts);
    let before = (position(&registry, five), position(&registry, three));
    let mut engine = PlacementEngine::headless(board.placement_config());

    drag(&mut engine, &mut registry, Vec2::new(60.0, 25.0), Vec2::new(0.0, 125.0));

    assert_eq!(cards_of(&registry, board.columns[1]), vec![five, three]);
    assert_eq!((position(&registry, five), position(&registry, three)), before);
    assert_eq!(cards_of(&registry, bay), vec![ogre]);
    assert!(cards_of(&registry, site).is_empty());
    assert!(cards_of(&registry, board.main_discard).is_empty());
}

/// A site with an empty bay takes cards without a fight.
#[test]
fn test_unguarded_site_builds() {
    let (mut registry, board) = table(descending_rules());
    let site = board.sites[0];
    let two = card(&mut registry, &board, board.columns[1], 2, Suit::Hearts);
    let mut engine = PlacementEngine::headless(board.placement_config());

    drag(&mut engine, &mut registry, Vec2::new(60.0, 0.0), Vec2::new(0.0, 100.0));

    assert_eq!(cards_of(&registry, site), vec![two]);
    assert!(!engine.damage_monster(&mut registry, site).unwrap());
}

/// A monster on top of a column blocks weak drops onto that column.
#[test]
fn test_column_monster_blocks_drop() {
    let (mut registry, board) = table(descending_rules());
    monster(&mut registry, &board, board.columns[0], 9);
    let five = card(&mut registry, &board, board.columns[1], 5, Suit::Hearts);
    let mut engine = PlacementEngine::headless(board.placement_config());

    drag(&mut engine, &mut registry, Vec2::new(60.0, 0.0), Vec2::new(0.0, 0.0));

    assert_eq!(slot_of(&registry, five), board.columns[1]);
}

// =============================================================================
// Monster release
// =============================================================================

/// Exposed monsters move to empty bays one after another.
#[test]
fn test_exposed_monsters_are_released() {
    let rules = descending_rules().with_sites(2);
    let (mut registry, board) = table(rules);
    let left = board.columns[0];
    let base = card(&mut registry, &board, left, 9, Suit::Spades);
    let deep = monster(&mut registry, &board, left, 5);
    let shallow = monster(&mut registry, &board, left, 5);
    let six = card(&mut registry, &board, left, 6, Suit::Hearts);
    let mut engine = PlacementEngine::headless(board.placement_config());

    // Top card sits at y = -60.
    drag(&mut engine, &mut registry, Vec2::new(0.0, -60.0), Vec2::new(60.0, 0.0));

    assert_eq!(slot_of(&registry, six), board.columns[1]);
    assert_eq!(cards_of(&registry, board.monster_bays[0]), vec![shallow]);
    assert_eq!(cards_of(&registry, board.monster_bays[1]), vec![deep]);
    assert_eq!(cards_of(&registry, left), vec![base]);
}

/// Release stops once every bay is occupied.
#[test]
fn test_release_stops_without_bay() {
    let (mut registry, board) = table(descending_rules());
    let left = board.columns[0];
    let deep = monster(&mut registry, &board, left, 5);
    let shallow = monster(&mut registry, &board, left, 5);
    let mut engine = PlacementEngine::headless(board.placement_config());

    assert_eq!(engine.release_monsters(&mut registry, left).unwrap(), 1);
    assert_eq!(cards_of(&registry, board.monster_bays[0]), vec![shallow]);
    assert_eq!(cards_of(&registry, left), vec![deep]);
    assert_eq!(engine.release_monsters(&mut registry, left).unwrap(), 0);
}

/// Released monsters are animated without a flip.
#[test]
fn test_release_requests_plain_transfer() {
    let (mut registry, board) = table(descending_rules());
    let ogre = monster(&mut registry, &board, board.columns[0], 5);
    let mut engine = PlacementEngine::new(board.placement_config(), RecordingAnimator::new());

    engine.init(&mut registry).unwrap();

    let requests = engine.animator().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].entity, ogre);
    assert_eq!(requests[0].flip_sprite(), None);
    assert_eq!(requests[0].to, position(&registry, ogre));
}

// =============================================================================
// Sequences onto single-card slots
// =============================================================================

/// A two-card sequence dropped on a freecell reverts both cards.
#[test]
fn test_sequence_onto_freecell_reverts_all() {
    let rules = descending_rules().with_freecells(1);
    let (mut registry, board) = table(rules);
    let left = board.columns[0];
    let five = card(&mut registry, &board, left, 5, Suit::Clubs);
    let three = card(&mut registry, &board, left, 3, Suit::Diamonds);
    let before = [position(&registry, five), position(&registry, three)];
    let mut engine = PlacementEngine::headless(board.placement_config());

    // The freecell sits right after the single site, at (60, 100).
    drag(&mut engine, &mut registry, Vec2::new(0.0, 25.0), Vec2::new(60.0, 100.0));

    assert!(cards_of(&registry, board.freecells[0]).is_empty());
    assert_eq!(cards_of(&registry, left), vec![five, three]);
    assert_eq!([position(&registry, five), position(&registry, three)], before);
}

/// Releasing with nothing held does nothing.
#[test]
fn test_release_without_hold_is_noop() {
    let (mut registry, board) = table(descending_rules());
    let five = card(&mut registry, &board, board.columns[0], 5, Suit::Clubs);
    let before = position(&registry, five);
    let mut engine = PlacementEngine::new(board.placement_config(), NoopAnimator);

    engine.on_pointer_released(&mut registry).unwrap();
    assert_eq!(position(&registry, five), before);
}
