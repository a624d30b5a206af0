#![no_main]

//! Full engine turn fuzzer.
//!
//! Builds an arbitrary (possibly inconsistent) observation and runs it
//! through several consecutive turns, checking that:
//! 1. `act` never panics
//! 2. Every own unit and base on the board gets exactly one action
//! 3. Moves stay on the torus

use arbitrary::Arbitrary;
use harvester::{Engine, GameConfig, Observation, Params, PlayerObservation, UnitAction};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated unit.
#[derive(Arbitrary, Debug, Clone)]
struct FuzzUnit {
    owner: u8,
    cell: u16,
    cargo: u16,
}

/// A fuzzer-generated base.
#[derive(Arbitrary, Debug, Clone)]
struct FuzzBase {
    owner: u8,
    cell: u16,
}

/// Structured input for turn fuzzing.
#[derive(Arbitrary, Debug)]
struct TurnInput {
    /// Board edge, reduced to 3..=16.
    size: u8,
    /// Number of players, reduced to 1..=4.
    players: u8,
    /// Starting treasuries.
    treasury: [u16; 4],
    /// Resource per cell (cycled over the board).
    halite: Vec<u16>,
    units: Vec<FuzzUnit>,
    bases: Vec<FuzzBase>,
    /// Turn index.
    step: u16,
    /// Number of turns to run.
    turns: u8,
}

fuzz_target!(|input: TurnInput| {
    // Cap values to avoid excessive runtime
    let size = usize::from(input.size % 14) + 3;
    let players = usize::from(input.players % 4) + 1;
    let turns = (input.turns % 4).max(1);
    let cells = size * size;

    let config = GameConfig {
        size,
        ..GameConfig::default()
    };
    let Ok(mut engine) = Engine::new(config, Params::default()) else {
        return;
    };

    let halite: Vec<f64> = if input.halite.is_empty() {
        vec![0.0; cells]
    } else {
        (0..cells)
            .map(|c| f64::from(input.halite[c % input.halite.len()] % 1000))
            .collect()
    };

    let mut observed: Vec<PlayerObservation> = (0..players)
        .map(|p| PlayerObservation::new(f64::from(input.treasury[p])))
        .collect();
    for (i, unit) in input.units.iter().take(60).enumerate() {
        let owner = usize::from(unit.owner) % players;
        let cell = usize::from(unit.cell) % (cells + 2);
        observed[owner] = std::mem::take(&mut observed[owner]).with_unit(
            format!("u{i}"),
            cell,
            f64::from(unit.cargo % 2000),
        );
    }
    for (i, base) in input.bases.iter().take(12).enumerate() {
        let owner = usize::from(base.owner) % players;
        let cell = usize::from(base.cell) % cells;
        observed[owner] = std::mem::take(&mut observed[owner]).with_base(format!("b{i}"), cell);
    }

    for t in 0..turns {
        let obs = Observation {
            player: 0,
            step: u32::from(input.step % 400) + u32::from(t),
            halite: halite.clone(),
            players: observed.clone(),
        };
        let actions = engine.act(&obs);

        let own_units: Vec<_> = observed[0]
            .units()
            .iter()
            .filter(|(_, (cell, _))| *cell < cells)
            .collect();
        assert_eq!(actions.units.len(), own_units.len());
        assert_eq!(actions.bases.len(), observed[0].bases().len());

        for (id, (cell, _)) in own_units {
            if let UnitAction::Move(dir) = actions.units[id] {
                assert!(engine.spatial().neighbour(*cell, dir) < cells);
            }
        }
    }
});
