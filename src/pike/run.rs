use super::builder::OpReader;
use super::{CounterTable, Cursor, GroupTable, Inst, PikeMatch, Program};
use std::collections::{HashSet, VecDeque};

// one pass of the VM over one input
struct RunOp<'p> {
    program: &'p Program,
    // byte offset and value of every input rune
    runes: Vec<(usize, char)>,
    input_len: usize,
    pos: usize,
    flow: VecDeque<Cursor>,
    flow_seen: HashSet<Cursor>,
    wait: VecDeque<Cursor>,
    wait_seen: HashSet<Cursor>,
    groups: GroupTable,
    counters: CounterTable,
    best: Option<usize>,
    best_groups: super::cursor::GroupId,
}

impl Program {
    /// Run the program over `input`, anchored at the start. The longest
    /// accepted prefix wins; among equally long accepts the first cursor in
    /// priority order keeps its captures.
    pub(crate) fn run(&self, input: &str) -> Option<PikeMatch> {
        let mut op = RunOp {
            program: self,
            runes: input.char_indices().collect(),
            input_len: input.len(),
            pos: 0,
            flow: VecDeque::new(),
            flow_seen: HashSet::new(),
            wait: VecDeque::new(),
            wait_seen: HashSet::new(),
            groups: GroupTable::new(),
            counters: CounterTable::new(),
            best: None,
            best_groups: Default::default(),
        };
        op.run();
        op.best.map(|end| PikeMatch {
            end,
            groups: op.groups.to_map(op.best_groups),
        })
    }
}

impl<'p> RunOp<'p> {
    fn run(&mut self) {
        self.add_flow(Cursor::default());
        loop {
            while let Some(cursor) = self.flow.pop_front() {
                self.step(cursor);
            }
            if self.wait.is_empty() {
                break;
            }
            // every waiting cursor has consumed the rune at pos; advance and swap
            self.pos += 1;
            std::mem::swap(&mut self.flow, &mut self.wait);
            std::mem::swap(&mut self.flow_seen, &mut self.wait_seen);
            self.wait_seen.clear();
        }
    }

    // the byte offset in front of the current rune
    fn offset(&self) -> usize {
        match self.runes.get(self.pos) {
            Some((at, _)) => *at,
            None => self.input_len,
        }
    }

    fn rune(&self) -> Option<char> {
        self.runes.get(self.pos).map(|(_, r)| *r)
    }

    fn add_flow(&mut self, cursor: Cursor) {
        if self.flow_seen.insert(cursor) {
            self.flow.push_back(cursor);
        }
    }

    fn add_wait(&mut self, cursor: Cursor) {
        if self.wait_seen.insert(cursor) {
            self.wait.push_back(cursor);
        }
    }

    // run one cursor until it consumes a rune or terminates; a cursor which
    // executes more instructions than the program holds is stuck repeating
    // ε work and is dropped
    fn step(&mut self, mut cursor: Cursor) {
        let code = self.program.code();
        let mut fuel = code.len().max(64);
        loop {
            if fuel == 0 {
                return;
            }
            fuel -= 1;
            let mut r = OpReader::at(code, cursor.ip);
            match r.inst() {
                Inst::Stop => return,
                Inst::Match => {
                    let expect = r.rune();
                    if self.rune() == Some(expect) {
                        cursor.ip = r.idx;
                        self.add_wait(cursor);
                    }
                    return;
                }
                Inst::MatchRange => {
                    let lo = r.rune();
                    let hi = r.rune();
                    if matches!(self.rune(), Some(c) if c >= lo && c <= hi) {
                        cursor.ip = r.idx;
                        self.add_wait(cursor);
                    }
                    return;
                }
                Inst::Branch => {
                    let target = r.u32();
                    let mut fork = cursor;
                    fork.ip = target;
                    self.add_flow(fork);
                    cursor.ip = r.idx;
                }
                Inst::Jump => {
                    cursor.ip = r.u32();
                    // a revisited state would loop without consuming
                    if !self.flow_seen.insert(cursor) {
                        return;
                    }
                }
                Inst::Accept => {
                    let end = self.offset();
                    if self.best.map_or(true, |best| end > best) {
                        self.best = Some(end);
                        self.best_groups = cursor.groups;
                    }
                    cursor.ip = r.idx;
                }
                Inst::StartGroup => {
                    let idx = r.u32();
                    cursor.partial_groups = self.groups.open(cursor.partial_groups, idx, self.offset());
                    cursor.ip = r.idx;
                }
                Inst::CloseGroup => {
                    let (partial, completed) =
                        self.groups
                            .close(cursor.partial_groups, cursor.groups, self.offset());
                    cursor.partial_groups = partial;
                    cursor.groups = completed;
                    cursor.ip = r.idx;
                }
                Inst::StartCounter => {
                    cursor.counter = self.counters.push(cursor.counter);
                    cursor.ip = r.idx;
                }
                Inst::IncCounter => {
                    cursor.counter = self.counters.inc(cursor.counter, self.program.counter_cap);
                    cursor.ip = r.idx;
                }
                Inst::CloseCounter => {
                    cursor.counter = self.counters.pop(cursor.counter);
                    cursor.ip = r.idx;
                }
                Inst::CkLtC => {
                    let val = r.u32();
                    if !(self.counters.value(cursor.counter) < val) {
                        return;
                    }
                    cursor.ip = r.idx;
                }
                Inst::CkGteC => {
                    let val = r.u32();
                    if !(self.counters.value(cursor.counter) >= val) {
                        return;
                    }
                    cursor.ip = r.idx;
                }
            }
        }
    }
}
