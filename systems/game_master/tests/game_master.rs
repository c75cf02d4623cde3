use std::{cell::RefCell, rc::Rc};

use maze_ctf_core::{BotId, Direction, Event, Position, Tag, TeamId};
use maze_ctf_system_game_master::{
    ConfigError, GameConfig, GameMaster, GameMasterError, GameState, Player, PlayerError,
    SimpleTeam, Viewer, ViewerError,
};
use maze_ctf_world::{query, Outcome, Universe};

use Direction::{East, South, Stop, West};

const START: &str = "
    ######
    #0 . #
    #.. 1#
    ######";

struct Script(Vec<Direction>);

impl Player for Script {
    fn get_move(&mut self, _bot: BotId, _universe: Universe) -> Result<Direction, PlayerError> {
        Ok(self.0.pop().unwrap_or(Stop))
    }
}

fn scripted_team(moves: Vec<Direction>) -> SimpleTeam {
    SimpleTeam::new(vec![Box::new(Script(moves))])
}

struct Silent;

impl Viewer for Silent {
    fn observe(
        &mut self,
        _round: u32,
        _turn: u32,
        _universe: Universe,
        _events: Vec<Event>,
    ) -> Result<(), ViewerError> {
        Ok(())
    }
}

fn scripted_game() -> GameMaster {
    let mut game = GameMaster::new(START, 2, 200).expect("valid layout");
    let _ = game
        .register_team(scripted_team(vec![East, East, East, South, Stop, East]), None)
        .expect("first slot");
    let _ = game
        .register_team(scripted_team(vec![West, West, West, Stop, West, West]), None)
        .expect("second slot");
    game
}

fn assert_board(game: &GameMaster, expected: &str, scores: [u32; 2]) {
    let universe = game.universe();
    assert_eq!(universe.to_layout_string(), expected);
    assert_eq!(query::scores(universe), scores.to_vec());
    assert_eq!(
        universe.bot(BotId::new(0)).map(|bot| bot.initial_position()),
        Some(Position::new(1, 1))
    );
    assert_eq!(
        universe.bot(BotId::new(1)).map(|bot| bot.initial_position()),
        Some(Position::new(4, 2))
    );
}

#[test]
fn scripted_game_plays_out_round_by_round() {
    let mut game = scripted_game();
    game.register_viewer(Silent).expect("viewer");
    game.set_initial().expect("both teams registered");
    assert_eq!(game.state(), GameState::Initialized);

    let expected = [
        ("######\n# 0. #\n#..1 #\n######", [0, 0]),
        ("######\n# 0. #\n#.1  #\n######", [0, 1]),
        ("######\n#  . #\n#.0 1#\n######", [0, 1]),
        ("######\n#0 . #\n#. 1 #\n######", [0, 1]),
        ("######\n# 0. #\n#.1  #\n######", [0, 1]),
        ("######\n#  0 #\n#.1  #\n######", [1, 1]),
    ];

    for (round, (layout, scores)) in (0_u32..).zip(expected) {
        game.play_round(round).expect("round plays");
        assert_board(&game, layout, scores);
    }

    assert_eq!(game.state(), GameState::Finished);
    assert_eq!(
        game.universe().outcome(),
        Some(Outcome::Winner(TeamId::new(0)))
    );
    assert!(matches!(
        game.play_round(6),
        Err(GameMasterError::GameFinished)
    ));
}

#[test]
fn full_game_matches_round_by_round_play() {
    let mut game = scripted_game();

    let outcome = game.play().expect("game completes");

    assert_eq!(outcome, Outcome::Winner(TeamId::new(0)));
    assert_board(&game, "######\n#  0 #\n#.1  #\n######", [1, 1]);
    assert_eq!(game.universe().round(), 5);
}

#[test]
fn rounds_must_be_played_in_order() {
    let mut game = scripted_game();

    let error = game.play_round(1).expect_err("round 0 is due");

    assert!(matches!(
        error,
        GameMasterError::RoundOutOfOrder {
            expected: 0,
            requested: 1
        }
    ));
}

#[test]
fn play_without_teams_fails_before_any_round() {
    let mut game = GameMaster::new(START, 2, 200).expect("valid layout");
    assert!(matches!(
        game.play(),
        Err(GameMasterError::MissingTeams {
            registered: 0,
            required: 2
        })
    ));

    let _ = game
        .register_team(scripted_team(Vec::new()), None)
        .expect("first slot");
    assert!(matches!(
        game.play(),
        Err(GameMasterError::MissingTeams {
            registered: 1,
            required: 2
        })
    ));
    assert_eq!(game.universe().round(), 0);
}

#[test]
fn team_slots_close_after_setup() {
    let mut game = scripted_game();
    assert!(matches!(
        game.register_team(scripted_team(Vec::new()), None),
        Err(GameMasterError::TooManyTeams(2))
    ));

    game.set_initial().expect("both teams registered");
    assert!(matches!(
        game.register_team(scripted_team(Vec::new()), None),
        Err(GameMasterError::LateRegistration)
    ));

    game.play_round(0).expect("round plays");
    assert!(matches!(
        game.register_viewer(Silent),
        Err(GameMasterError::LateRegistration)
    ));
}

#[test]
fn unimplemented_collaborators_surface_errors() {
    struct Lazy;
    impl Player for Lazy {}

    let mut game = GameMaster::new(START, 2, 200).expect("valid layout");
    let _ = game
        .register_team(SimpleTeam::new(vec![Box::new(Lazy)]), None)
        .expect("first slot");
    let _ = game
        .register_team(scripted_team(Vec::new()), None)
        .expect("second slot");
    assert!(matches!(
        game.play(),
        Err(GameMasterError::Player {
            source: PlayerError::NotImplemented,
            ..
        })
    ));

    struct Blind;
    impl Viewer for Blind {}

    let mut game = scripted_game();
    game.register_viewer(Blind).expect("viewer");
    assert!(matches!(
        game.play_round(0),
        Err(GameMasterError::Viewer(ViewerError::NotImplemented))
    ));
}

#[test]
fn teams_without_enough_players_are_rejected() {
    let mut game = GameMaster::new(
        "
        ########
        #0 2 31#
        ########",
        4,
        10,
    )
    .expect("valid layout");
    let _ = game
        .register_team(scripted_team(Vec::new()), None)
        .expect("first slot");
    let _ = game
        .register_team(scripted_team(Vec::new()), None)
        .expect("second slot");

    assert!(matches!(
        game.set_initial(),
        Err(GameMasterError::Player {
            source: PlayerError::MissingPlayer(bot),
            ..
        }) if bot == BotId::new(2)
    ));
}

#[test]
fn players_see_team_names_from_the_start() {
    struct NameRecorder(Rc<RefCell<Vec<Vec<String>>>>);
    impl Player for NameRecorder {
        fn set_initial(&mut self, _bot: BotId, universe: Universe) -> Result<(), PlayerError> {
            self.0.borrow_mut().push(
                universe
                    .teams()
                    .iter()
                    .map(|team| team.name().to_owned())
                    .collect(),
            );
            Ok(())
        }
    }

    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut game = GameMaster::new(
        "
        ##########
        #0 2  3 1#
        ##########",
        4,
        10,
    )
    .expect("valid layout");
    for name in ["team1", "team2"] {
        let team = SimpleTeam::new(vec![
            Box::new(NameRecorder(Rc::clone(&seen))),
            Box::new(NameRecorder(Rc::clone(&seen))),
        ]);
        let _ = game
            .register_team(team, Some(name.to_owned()))
            .expect("free slot");
    }

    game.set_initial().expect("both teams registered");

    let seen = seen.borrow();
    assert_eq!(seen.len(), 4);
    for names in seen.iter() {
        assert_eq!(names, &["team1".to_owned(), "team2".to_owned()]);
    }
}

#[test]
fn malicious_players_cannot_touch_the_game() {
    let original = Universe::from_layout(START, 2).expect("valid layout");

    struct Vandal;
    impl Player for Vandal {
        fn get_move(&mut self, _bot: BotId, mut universe: Universe) -> Result<Direction, PlayerError> {
            if let Some(team) = universe.team_mut(TeamId::new(0)) {
                team.award(100);
            }
            if let Some(bot) = universe.bot_mut(BotId::new(0)) {
                bot.set_current_position(Position::new(2, 2));
            }
            universe
                .maze_mut()
                .set(Position::new(0, 0), Tag::Free)
                .map_err(|error| PlayerError::failed(error.to_string()))?;
            Ok(Stop)
        }
    }

    struct Witness {
        original: Universe,
        calls: Rc<RefCell<u32>>,
    }
    impl Player for Witness {
        fn get_move(&mut self, _bot: BotId, universe: Universe) -> Result<Direction, PlayerError> {
            assert_eq!(universe, self.original, "snapshot reflects another player's edits");
            *self.calls.borrow_mut() += 1;
            Ok(Stop)
        }
    }

    let calls = Rc::new(RefCell::new(0));
    let mut game = GameMaster::new(START, 2, 200).expect("valid layout");
    let _ = game
        .register_team(SimpleTeam::new(vec![Box::new(Vandal)]), None)
        .expect("first slot");
    let _ = game
        .register_team(
            SimpleTeam::new(vec![Box::new(Witness {
                original: original.clone(),
                calls: Rc::clone(&calls),
            })]),
            None,
        )
        .expect("second slot");

    game.set_initial().expect("both teams registered");
    for round in 0..3 {
        game.play_round(round).expect("round plays");
        assert_eq!(game.universe(), &original);
    }

    assert_eq!(*calls.borrow(), 3);
    assert_eq!(game.universe().round(), 3);
}

#[test]
fn viewers_cannot_touch_the_game_or_each_other() {
    let original = Universe::from_layout(START, 2).expect("valid layout");

    struct Mean;
    impl Viewer for Mean {
        fn set_initial(&mut self, mut universe: Universe) -> Result<(), ViewerError> {
            if let Some(team) = universe.team_mut(TeamId::new(1)) {
                team.award(50);
            }
            Ok(())
        }

        fn observe(
            &mut self,
            _round: u32,
            _turn: u32,
            mut universe: Universe,
            mut events: Vec<Event>,
        ) -> Result<(), ViewerError> {
            if let Some(team) = universe.team_mut(TeamId::new(0)) {
                team.award(100);
            }
            if let Some(bot) = universe.bot_mut(BotId::new(0)) {
                bot.set_current_position(Position::new(4, 4));
            }
            universe
                .maze_mut()
                .set(Position::new(0, 0), Tag::Free)
                .map_err(|error| ViewerError::failed(error.to_string()))?;
            events.push(Event::TeamWins {
                team: TeamId::new(0),
            });
            assert_eq!(events.len(), 2);
            Ok(())
        }
    }

    struct Checker {
        original: Universe,
        calls: Rc<RefCell<u32>>,
    }
    impl Viewer for Checker {
        fn observe(
            &mut self,
            _round: u32,
            _turn: u32,
            universe: Universe,
            events: Vec<Event>,
        ) -> Result<(), ViewerError> {
            assert_eq!(universe, self.original);
            assert_eq!(events.len(), 1);
            assert!(matches!(events[0], Event::BotMoved { .. }));
            *self.calls.borrow_mut() += 1;
            Ok(())
        }
    }

    let calls = Rc::new(RefCell::new(0));
    let mut game = GameMaster::new(START, 2, 200).expect("valid layout");
    let _ = game
        .register_team(scripted_team(vec![Stop]), None)
        .expect("first slot");
    let _ = game
        .register_team(scripted_team(vec![Stop]), None)
        .expect("second slot");
    game.register_viewer(Mean).expect("viewer");
    game.register_viewer(Checker {
        original: original.clone(),
        calls: Rc::clone(&calls),
    })
    .expect("viewer");

    game.set_initial().expect("both teams registered");
    for round in 0..3 {
        game.play_round(round).expect("round plays");
        assert_eq!(game.universe(), &original);
    }

    assert_eq!(*calls.borrow(), 6);
    assert_eq!(game.universe().round(), 3);
}

#[test]
fn reaching_max_rounds_concludes_by_score() {
    struct Recorder(Rc<RefCell<Vec<(u32, u32, Vec<Event>)>>>);
    impl Viewer for Recorder {
        fn observe(
            &mut self,
            round: u32,
            turn: u32,
            _universe: Universe,
            events: Vec<Event>,
        ) -> Result<(), ViewerError> {
            self.0.borrow_mut().push((round, turn, events));
            Ok(())
        }
    }

    let log = Rc::new(RefCell::new(Vec::new()));
    let mut game = GameMaster::new(START, 2, 3).expect("valid layout");
    let _ = game
        .register_team(scripted_team(Vec::new()), None)
        .expect("first slot");
    let _ = game
        .register_team(scripted_team(Vec::new()), None)
        .expect("second slot");
    game.register_viewer(Recorder(Rc::clone(&log))).expect("viewer");

    assert_eq!(game.play().expect("game completes"), Outcome::Draw);

    let log = log.borrow();
    let turns: Vec<(u32, u32)> = log.iter().map(|(round, turn, _)| (*round, *turn)).collect();
    assert_eq!(turns, vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)]);
    let (_, _, last_events) = log.last().expect("turns were observed");
    assert_eq!(last_events.last(), Some(&Event::GameDraw));
    assert_eq!(game.universe().round(), 3);
}

#[test]
fn seeded_configuration_builds_a_game() {
    let config = GameConfig::builder()
        .layout_string(START)
        .bot_count(2)
        .max_rounds(10)
        .noise(false)
        .seed(17)
        .build()
        .expect("valid configuration");
    let mut game = GameMaster::from_config(&config).expect("valid layout");
    let _ = game
        .register_team(scripted_team(Vec::new()), None)
        .expect("first slot");
    let _ = game
        .register_team(scripted_team(Vec::new()), None)
        .expect("second slot");

    assert_eq!(game.max_rounds(), 10);
    assert_eq!(game.play().expect("game completes"), Outcome::Draw);
    assert_eq!(
        game.universe().to_layout_string(),
        "######\n#0 . #\n#.. 1#\n######"
    );
}

#[test]
fn malformed_layouts_are_rejected_at_construction() {
    assert!(matches!(
        GameMaster::new("#####\n#0 1 \n#####", 2, 10),
        Err(GameMasterError::Layout(_))
    ));
    assert!(matches!(
        GameMaster::new(START, 2, 0),
        Err(GameMasterError::Config(ConfigError::NoRounds))
    ));

    let config = GameConfig::builder()
        .layout_name("labyrinth")
        .build()
        .expect("single source");
    assert!(matches!(
        GameMaster::from_config(&config),
        Err(GameMasterError::Config(_))
    ));
}
