use std::fmt::{Display, Formatter};

use itertools::Itertools;
use ndarray::Array2;
use petgraph::graphmap::UnGraphMap;
use petgraph::visit::Dfs;
use strum::VariantArray;
use unordered_pair::UnorderedPair;

use crate::connection::{Connection, ConnectionId, Segment, MAX_BRIDGES};
use crate::direction::Direction;
use crate::island::{Island, IslandId};
use crate::location::{Coord, Location};

/// Per island, the connection reaching the nearest island in each direction,
/// indexed by [`Direction::index`].
type Neighborhood = [Option<ConnectionId>; 4];

/// Overall condition of a [`Puzzle`], derived from its current bridge counts.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PuzzleState {
    /// Still playable; at least one bridge may be added.
    NotSolved,
    /// Every island is satisfied and all islands form one network.
    Solved,
    /// Two bridges cross, or an island has more bridges than it requires.
    Error,
    /// No connection can take another bridge, yet the puzzle is not solved.
    NoLongerSolvable,
}

/// A Bridges puzzle: a `width` by `height` field with islands and the connections between them.
///
/// A puzzle owns its islands and connections outright; connections refer to islands by
/// [`IslandId`].
/// Puzzles are normally obtained from a [`PuzzleBuilder`](crate::PuzzleBuilder) or a
/// [`Generator`](crate::Generator), both of which validate before handing one out.
#[derive(Clone, Debug)]
pub struct Puzzle {
    pub(crate) width: Coord,
    pub(crate) height: Coord,
    pub(crate) islands: Vec<Island>,
    pub(crate) connections: Vec<Connection>,
    adjacency: Vec<Neighborhood>,
}

impl Puzzle {
    pub(crate) fn from_parts(
        width: Coord,
        height: Coord,
        islands: Vec<Island>,
        connections: Vec<Connection>,
    ) -> Self {
        let mut puzzle = Self {
            width,
            height,
            islands,
            connections,
            adjacency: Vec::new(),
        };
        puzzle.rebuild_adjacency();
        puzzle
    }

    /// An empty field.
    pub(crate) fn empty(width: Coord, height: Coord) -> Self {
        Self::from_parts(width, height, Vec::new(), Vec::new())
    }

    /// Number of columns.
    pub fn width(&self) -> Coord {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> Coord {
        self.height
    }

    /// All islands, indexed by [`IslandId`].
    pub fn islands(&self) -> &[Island] {
        &self.islands
    }

    /// All connections, built or not, indexed by [`ConnectionId`].
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// The island with id `id`.
    pub fn island(&self, id: IslandId) -> Option<&Island> {
        self.islands.get(id)
    }

    /// The connection with id `id`.
    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }

    /// Connections carrying at least one bridge, i.e. what a serializer writes out.
    pub fn built_connections(&self) -> impl Iterator<Item = (ConnectionId, &Connection)> {
        self.connections
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_built())
    }

    /// The island standing on `location`, if any.
    pub fn island_at(&self, location: Location) -> Option<&Island> {
        self.islands
            .iter()
            .find(|island| island.location == location)
    }

    /// The connection joining `a` and `b`, in either declared order.
    pub fn connection_between(&self, a: IslandId, b: IslandId) -> Option<ConnectionId> {
        let pair = UnorderedPair(a, b);
        self.connections.iter().position(|c| c.islands() == pair)
    }

    /// The connection leaving `island` towards `direction`, per the adjacency index.
    pub fn neighbor(&self, island: IslandId, direction: Direction) -> Option<ConnectionId> {
        self.adjacency.get(island).and_then(|slots| slots[direction.index()])
    }

    /// All connections in the adjacency index of `island`, in [`Direction`] order.
    pub fn neighbors(
        &self,
        island: IslandId,
    ) -> impl Iterator<Item = (Direction, ConnectionId)> + '_ {
        Direction::VARIANTS
            .iter()
            .filter_map(move |dir| self.neighbor(island, *dir).map(|id| (*dir, id)))
    }

    pub(crate) fn add_island(&mut self, location: Location, required_bridges: u8) -> IslandId {
        let id = self.islands.len();
        self.islands.push(Island::new(id, location, required_bridges));
        self.adjacency.push(Neighborhood::default());
        id
    }

    pub(crate) fn add_connection(
        &mut self,
        start: IslandId,
        end: IslandId,
        bridge_count: u8,
    ) -> ConnectionId {
        self.connections.push(Connection::new(start, end, bridge_count));
        self.rebuild_adjacency();
        self.connections.len() - 1
    }

    pub(crate) fn remove_connection(&mut self, id: ConnectionId) -> Option<Connection> {
        if id >= self.connections.len() {
            return None;
        }

        let removed = self.connections.remove(id);
        self.rebuild_adjacency();
        Some(removed)
    }

    /// The line a connection occupies, if both endpoints exist.
    pub(crate) fn segment(&self, connection: &Connection) -> Option<Segment> {
        Some(Segment::new(
            self.island(connection.start)?.location,
            self.island(connection.end)?.location,
        ))
    }

    fn rebuild_adjacency(&mut self) {
        let mut adjacency = vec![Neighborhood::default(); self.islands.len()];

        for (id, connection) in self.connections.iter().enumerate() {
            let (Some(start), Some(end)) =
                (self.island(connection.start), self.island(connection.end))
            else {
                continue;
            };
            let Some(direction) = Direction::direction_to(start.location, end.location) else {
                continue;
            };

            adjacency[start.id][direction.index()] = Some(id);
            adjacency[end.id][direction.invert().index()] = Some(id);
        }

        self.adjacency = adjacency;
    }

    /// The nearest island seen from `island` looking towards `direction`.
    ///
    /// Only the nearest one can be seen, so no island ever lies between the two.
    pub fn nearest_in_direction(&self, island: IslandId, direction: Direction) -> Option<IslandId> {
        let origin = self.island(island)?.location;

        self.islands
            .iter()
            .filter(|other| other.id != island)
            .filter(|other| Direction::direction_to(origin, other.location) == Some(direction))
            .min_by_key(|other| origin.distance_to(other.location))
            .map(|other| other.id)
    }

    /// Probe the four directions from every island and add a zero-count connection for every
    /// pair of mutually visible islands not yet connected. Existing connections are kept.
    ///
    /// Leaves the connection list sorted by `(lower island id, higher island id)` and the adjacency
    /// index current. Idempotent.
    pub fn fill_missing_connections(&mut self) {
        for island in 0..self.islands.len() {
            for direction in Direction::VARIANTS {
                let Some(other) = self.nearest_in_direction(island, *direction) else {
                    continue;
                };

                if self.connection_between(island, other).is_none() {
                    self.connections
                        .push(Connection::new(island.min(other), island.max(other), 0));
                }
            }
        }

        self.connections.sort_by_key(Connection::sort_key);
        self.rebuild_adjacency();
    }

    /// Required bridges of `island` minus those already built around it.
    ///
    /// Negative when over-built. An id not in this puzzle has nothing remaining.
    pub fn remaining_bridge_count(&self, island: IslandId) -> i32 {
        let Some(this) = self.island(island) else {
            return 0;
        };

        let built: i32 = self
            .neighbors(island)
            .filter_map(|(_, id)| self.connection(id))
            .map(|c| i32::from(c.bridge_count))
            .sum();

        i32::from(this.required_bridges) - built
    }

    /// Every pair of built connections which cross one another.
    ///
    /// All pairs are compared; nothing is cached.
    pub fn crossing_pairs(&self) -> Vec<(ConnectionId, ConnectionId)> {
        self.built_connections()
            .filter_map(|(id, c)| self.segment(c).map(|segment| (id, segment)))
            .collect_vec()
            .into_iter()
            .tuple_combinations()
            .filter(|((_, a), (_, b))| a.crosses(b))
            .map(|((a, _), (b, _))| (a, b))
            .collect_vec()
    }

    /// Recompute every connection's `valid` flag from scratch.
    pub fn mark_invalid_connections(&mut self) {
        self.connections
            .iter_mut()
            .for_each(|c| c.valid = true);

        for (a, b) in self.crossing_pairs() {
            self.connections[a].valid = false;
            self.connections[b].valid = false;
        }
    }

    /// Whether adding a bridge to `connection` would make it cross an already built connection.
    pub fn would_cross(&self, connection: ConnectionId) -> bool {
        let Some(segment) = self
            .connection(connection)
            .and_then(|c| self.segment(c))
        else {
            return false;
        };

        self.built_connections()
            .filter(|(id, _)| *id != connection)
            .filter_map(|(_, c)| self.segment(c))
            .any(|other| segment.crosses(&other))
    }

    /// Two islands requiring a single bridge each may not be joined to each other unless they are
    /// the whole puzzle: the pair would be cut off from everything else.
    fn isolates_pair(&self, connection: &Connection) -> bool {
        let required = |id| self.island(id).map(|island| island.required_bridges);

        self.islands.len() > 2
            && required(connection.start) == Some(1)
            && required(connection.end) == Some(1)
    }

    /// Whether one more bridge may be placed on `connection` without breaking a rule outright.
    ///
    /// Checks the bridge limit, remaining counts at both ends, crossings, and isolated
    /// single-bridge pairs.
    pub fn has_possible_move(&self, connection: ConnectionId) -> bool {
        let Some(c) = self.connection(connection) else {
            return false;
        };

        c.bridge_count < MAX_BRIDGES
            && self.remaining_bridge_count(c.start) > 0
            && self.remaining_bridge_count(c.end) > 0
            && !self.would_cross(connection)
            && !self.isolates_pair(c)
    }

    /// Whether the built bridges join every island into one network, via a depth-first walk from
    /// island 0.
    pub fn is_connected(&self) -> bool {
        if self.islands.is_empty() {
            return true;
        }

        let mut graph: UnGraphMap<IslandId, ConnectionId> =
            UnGraphMap::with_capacity(self.islands.len(), self.connections.len());
        for island in &self.islands {
            graph.add_node(island.id);
        }
        for (id, c) in self.built_connections() {
            if self.island(c.start).is_some() && self.island(c.end).is_some() {
                graph.add_edge(c.start, c.end, id);
            }
        }

        let mut dfs = Dfs::new(&graph, 0);
        let mut visited = 0;
        while dfs.next(&graph).is_some() {
            visited += 1;
        }

        visited == self.islands.len()
    }

    /// Evaluate the puzzle from its current bridge counts.
    ///
    /// Errors dominate: crossings or over-built islands give [`PuzzleState::Error`] regardless of
    /// anything else.
    pub fn state(&self) -> PuzzleState {
        let remaining = (0..self.islands.len())
            .map(|id| self.remaining_bridge_count(id))
            .collect_vec();

        if !self.crossing_pairs().is_empty() || remaining.iter().any(|r| *r < 0) {
            return PuzzleState::Error;
        }

        if remaining.iter().all(|r| *r == 0) && self.is_connected() {
            return PuzzleState::Solved;
        }

        if !(0..self.connections.len()).any(|id| self.has_possible_move(id)) {
            return PuzzleState::NoLongerSolvable;
        }

        PuzzleState::NotSolved
    }

    /// Remove every bridge.
    pub fn restart(&mut self) {
        for connection in self.connections.iter_mut() {
            connection.bridge_count = 0;
            connection.valid = true;
            connection.emphasized = false;
        }
    }

    /// Set the bridge count of `connection`. Returns `false`, changing nothing, if either is out of
    /// range.
    pub fn set_bridge_count(&mut self, connection: ConnectionId, bridge_count: u8) -> bool {
        match self.connections.get_mut(connection) {
            Some(c) if bridge_count <= MAX_BRIDGES => {
                c.bridge_count = bridge_count;
                true
            }
            _ => false,
        }
    }

    /// Add one bridge to `connection`. Returns `false` if it already carries two or does not exist.
    pub fn increment_bridge(&mut self, connection: ConnectionId) -> bool {
        match self.connection(connection).map(|c| c.bridge_count) {
            Some(count) => self.set_bridge_count(connection, count + 1),
            None => false,
        }
    }

    /// Step `connection` through none, single and double bridge, as a player's click does.
    pub fn cycle_bridge(&mut self, connection: ConnectionId) -> Option<u8> {
        let c = self.connections.get_mut(connection)?;
        c.bridge_count = (c.bridge_count + 1) % (MAX_BRIDGES + 1);
        Some(c.bridge_count)
    }

    /// Highlight `connection`, or stop highlighting it.
    pub fn set_emphasized(&mut self, connection: ConnectionId, emphasized: bool) {
        if let Some(c) = self.connections.get_mut(connection) {
            c.emphasized = emphasized;
        }
    }

    /// Stop highlighting every connection.
    pub fn clear_emphasis(&mut self) {
        self.connections
            .iter_mut()
            .for_each(|c| c.emphasized = false);
    }

    /// Make every island require exactly the bridges currently built around it.
    pub(crate) fn recompute_required_bridges(&mut self) {
        let mut totals = vec![0u8; self.islands.len()];
        for c in &self.connections {
            for id in [c.start, c.end] {
                if let Some(total) = totals.get_mut(id) {
                    *total = total.saturating_add(c.bridge_count);
                }
            }
        }

        for (island, total) in self.islands.iter_mut().zip(totals) {
            island.required_bridges = total;
        }
    }

    fn to_array(&self) -> Array2<char> {
        let mut field = Array2::from_elem((self.height, self.width), '.');

        for (_, c) in self.built_connections() {
            let Some(segment) = self.segment(c) else {
                continue;
            };
            let Some(direction) = Direction::direction_to(segment.a, segment.b) else {
                continue;
            };
            let symbol = match (direction.is_horizontal(), c.is_double()) {
                (true, false) => '-',
                (true, true) => '=',
                (false, false) => '|',
                (false, true) => 'H',
            };

            for step in 1..segment.len() {
                if let Some(cell) = direction
                    .attempt_many_from(segment.a, step)
                    .and_then(|location| field.get_mut(location.as_index()))
                {
                    *cell = symbol;
                }
            }
        }

        for island in &self.islands {
            if let Some(cell) = field.get_mut(island.location.as_index()) {
                *cell = char::from_digit(u32::from(island.required_bridges), 10)
                    .unwrap_or('?');
            }
        }

        field
    }
}

impl Display for Puzzle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let field = self.to_array();
        let mut out = String::with_capacity(field.nrows() * (field.ncols() + 1));

        for row in field.rows() {
            for cell in row {
                out.push(*cell);
            }
            out.push('\n');
        }

        write!(f, "{}", out)
    }
}
