//! Capture-the-flag rules executed by [`crate::apply`].

use maze_ctf_core::{BotId, Direction, Event, Position, Tag, TeamId};

use crate::{Outcome, Universe};

impl Universe {
    /// Moves one bot and resolves food, collisions and food exhaustion.
    pub(crate) fn move_bot(&mut self, id: BotId, direction: Direction, out_events: &mut Vec<Event>) {
        if self.outcome.is_some() {
            return;
        }
        let Some(bot) = self.bots.get(id.index()) else {
            return;
        };

        let from = bot.current_position;
        let destination = from
            .step(direction)
            .filter(|target| self.maze.is_free(*target));
        let to = match destination {
            Some(target) => target,
            None => {
                out_events.push(Event::MoveRejected {
                    bot: id,
                    requested: direction,
                });
                from
            }
        };

        self.bots[id.index()].current_position = to;
        self.turn = id.get();
        out_events.push(Event::BotMoved { bot: id, from, to });

        let ate = self.resolve_food(id, to, out_events);
        self.resolve_collisions(id, to, out_events);
        if ate {
            let team = self.bots[id.index()].team;
            self.resolve_food_exhaustion(team, out_events);
        }
    }

    /// Ends the game by score unless an outcome already exists.
    pub(crate) fn conclude(&mut self, out_events: &mut Vec<Event>) {
        if self.outcome.is_some() {
            return;
        }

        let best = self.teams.iter().map(|team| team.score).max().unwrap_or(0);
        let mut leaders = self.teams.iter().filter(|team| team.score == best);
        let outcome = match (leaders.next(), leaders.next()) {
            (Some(team), None) => Outcome::Winner(team.id),
            _ => Outcome::Draw,
        };
        self.finish(outcome, out_events);
    }

    /// Returns whether the bot ate the food at `position`.
    fn resolve_food(
        &mut self,
        id: BotId,
        position: Position,
        out_events: &mut Vec<Event>,
    ) -> bool {
        if !self.is_harvester(id) || !self.maze.take_food(position) {
            return false;
        }

        let team = self.bots[id.index()].team;
        if let Some(scorer) = self.team_mut(team) {
            scorer.award(1);
        }
        out_events.push(Event::FoodEaten { bot: id, position });
        out_events.push(Event::TeamScored { team, delta: 1 });
        true
    }

    fn resolve_collisions(&mut self, id: BotId, position: Position, out_events: &mut Vec<Event>) {
        let team = self.bots[id.index()].team;
        let opponents: Vec<BotId> = self
            .bots_at(position)
            .filter(|other| other.team != team)
            .map(|other| other.id)
            .collect();

        for opponent in opponents {
            if self.bots[id.index()].current_position != position {
                break;
            }

            match (self.is_harvester(id), self.is_harvester(opponent)) {
                (true, false) => self.destroy(id, opponent, out_events),
                (false, true) => self.destroy(opponent, id, out_events),
                _ => {}
            }
        }
    }

    fn destroy(&mut self, victim: BotId, destroyed_by: BotId, out_events: &mut Vec<Event>) {
        let bot = &mut self.bots[victim.index()];
        bot.current_position = bot.initial_position;
        out_events.push(Event::BotDestroyed {
            bot: victim,
            destroyed_by,
            respawn: bot.initial_position,
        });
    }

    /// The team that just ate wins once no food is left outside its zone.
    fn resolve_food_exhaustion(&mut self, eater: TeamId, out_events: &mut Vec<Event>) {
        let Some(zone) = self.team(eater).map(|team| team.zone) else {
            return;
        };
        let exhausted = self
            .maze
            .pos_of(Tag::Food)
            .into_iter()
            .all(|position| zone.contains(position));
        if exhausted {
            self.finish(Outcome::Winner(eater), out_events);
        }
    }

    fn finish(&mut self, outcome: Outcome, out_events: &mut Vec<Event>) {
        self.outcome = Some(outcome);
        out_events.push(match outcome {
            Outcome::Winner(team) => Event::TeamWins { team },
            Outcome::Draw => Event::GameDraw,
        });
    }
}
