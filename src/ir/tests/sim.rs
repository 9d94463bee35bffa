use crate::ir::Tac;
use std::collections::{HashMap, VecDeque};

const STEP_LIMIT: usize = 100_000;

/// A small interpreter for lowered code, used to check what the emitted
/// instructions compute rather than how they are spelled.
#[derive(Debug, Default)]
pub struct Machine {
    vars: HashMap<String, i64>,
    arrays: HashMap<String, Vec<i64>>,
    input: VecDeque<i64>,
}

impl Machine {
    pub fn run(instrs: &[Tac], input: Vec<i64>) -> Machine {
        let mut machine = Machine {
            input: input.into(),
            ..Machine::default()
        };
        let labels: HashMap<&str, usize> = instrs
            .iter()
            .enumerate()
            .filter_map(|(i, instr)| match instr {
                Tac::Label { label } => Some((label.as_str(), i)),
                _ => None,
            })
            .collect();
        let mut pc = 0;

        for _ in 0..STEP_LIMIT {
            let instr = match instrs.get(pc) {
                Some(instr) => instr,
                None => return machine,
            };

            pc += 1;

            match instr {
                Tac::Assign { dest, src } => {
                    let value = machine.read(src);
                    machine.write(dest, value);
                }
                Tac::Binop { dest, lhs, op, rhs } => {
                    let (l, r) = (machine.read(lhs), machine.read(rhs));
                    let value = match *op {
                        "+" => l + r,
                        "-" => l - r,
                        "*" => l * r,
                        "/" => l / r,
                        "%" => l % r,
                        "<<" => l << r,
                        ">>" => l >> r,
                        "and" => l & r,
                        "xor" => l ^ r,
                        "or" => l | r,
                        other => panic!("unknown operator {}", other),
                    };
                    machine.write(dest, value);
                }
                Tac::Declare { dest, size, .. } => {
                    let size = machine.read(size) as usize;
                    machine.arrays.insert(dest.clone(), vec![0; size]);
                }
                Tac::Input { dest } => {
                    let value = machine.input.pop_front().expect("program read past its input");
                    machine.write(dest, value);
                }
                Tac::Goto { label } => pc = labels[label.as_str()],
                Tac::IfGoto { lhs, cmp, rhs, label } => {
                    if cmp.holds(machine.read(lhs), machine.read(rhs)) {
                        pc = labels[label.as_str()];
                    }
                }
                Tac::Ret => return machine,
                Tac::Label { .. } | Tac::Func { .. } | Tac::CallLabel { .. } => {}
            }
        }

        panic!("program did not stop within {} steps", STEP_LIMIT)
    }

    pub fn get(&self, name: &str) -> i64 {
        self.read(name)
    }

    fn read(&self, place: &str) -> i64 {
        if let Ok(value) = place.parse() {
            return value;
        }

        match split_element(place) {
            Some((base, index)) => self.arrays[base][self.read(index) as usize],
            None => *self.vars.get(place).unwrap_or(&0),
        }
    }

    fn write(&mut self, place: &str, value: i64) {
        match split_element(place) {
            Some((base, index)) => {
                let index = self.read(index) as usize;
                self.arrays.get_mut(base).expect("array is declared")[index] = value;
            }
            None => {
                self.vars.insert(place.to_string(), value);
            }
        }
    }
}

fn split_element(place: &str) -> Option<(&str, &str)> {
    let (base, rest) = place.split_once('[')?;

    Some((base, rest.strip_suffix(']')?))
}
