//! This module provides parsers for the PMS and WCNF file formats. Given that these files can be
//! very large, the implementation is designed to read the file in chunks. The parser also will not
//! allocate for every encountered clause, but rather re-use its buffers.
//!
//! To invoke the parser, there are two options:
//!  - For a PMS file, the [`parse_pms`] function can be called,
//!  - For a WCNF file, the [`parse_wcnf`] function can be called.
//!
//! Both these functions operate on a type that implements the [`DimacsSink`] trait, which serves
//! as an interface to the consumer of the parsed contents of the file.
//!
//! # The PMS format
//! ```text
//! c comments start with 'c' at the beginning of a line
//! p pms <num_variables> <num_hard_clauses> <num_soft_clauses>
//! <weight of soft clause 1> ... <weight of soft clause S>
//! <hard clause 1> 0
//! ...
//! <soft clause 1> 0
//! ...
//! ```
//! The tag after `p` is not interpreted. Literals are non-zero integers whose magnitude is the
//! 1-based variable index and whose sign is the polarity. Tokens may be spread over lines freely.
//!
//! # The WCNF format
//! ```text
//! p wcnf <num_variables> <num_clauses> <top>
//! <weight> <clause> 0
//! ...
//! ```
//! A clause whose weight is at least `top` is hard; every other clause is soft.
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::num::NonZeroI32;
use std::str::FromStr;

use thiserror::Error;

use crate::basic_types::Weight;
use crate::engine::Formula;
use crate::engine::WeightOverflow;
use crate::variables::Literal;

/// A dimacs sink stores the clauses of a formula while it is being parsed.
pub trait DimacsSink {
    /// The arguments to the dimacs sink.
    type ConstructorArgs;

    /// The underlying formula type.
    type Formula;

    /// Create an empty formula over `num_variables` variables.
    fn empty(args: Self::ConstructorArgs, num_variables: usize) -> Self;

    /// Add a new hard clause to the formula. Every literal is within the declared variable range.
    fn add_hard_clause(&mut self, clause: &[NonZeroI32]);

    /// Add a new soft clause with the given weight to the formula.
    fn add_soft_clause(&mut self, clause: &[NonZeroI32], weight: Weight)
        -> Result<(), WeightOverflow>;

    /// Take the collected clauses and turn it into the underlying formula type.
    fn into_formula(self) -> Self::Formula;
}

#[derive(Debug, Error)]
pub enum MalformedInputError {
    #[error("failed to read file")]
    Io(#[from] std::io::Error),

    #[error("missing header")]
    MissingHeader,

    #[error("'{0}' is an invalid header")]
    InvalidHeader(String),

    #[error("multiple headers found")]
    DuplicateHeader,

    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    #[error("'{0}' is not a valid integer")]
    InvalidNumber(String),

    #[error("{0} is an invalid clause weight")]
    InvalidWeight(i64),

    #[error("literal {literal} refers to a variable outside of 1..={num_variables}")]
    LiteralOutOfRange { literal: i64, num_variables: usize },

    #[error("expected {expected} clause weights, but parsed {parsed}")]
    MissingWeights { expected: usize, parsed: usize },

    #[error("the last clause in the source is not terminated with a '0'")]
    UnterminatedClause,

    #[error("expected to parse {expected} clauses, but parsed {parsed}")]
    IncorrectClauseCount { expected: usize, parsed: usize },

    #[error(transparent)]
    WeightOverflow(#[from] WeightOverflow),
}

pub fn parse_pms<Sink: DimacsSink>(
    source: impl Read,
    sink_constructor_args: Sink::ConstructorArgs,
) -> Result<Sink::Formula, MalformedInputError> {
    parse::<Sink, PmsHeader>(source, sink_constructor_args)
}

pub fn parse_wcnf<Sink: DimacsSink>(
    source: impl Read,
    sink_constructor_args: Sink::ConstructorArgs,
) -> Result<Sink::Formula, MalformedInputError> {
    parse::<Sink, WcnfHeader>(source, sink_constructor_args)
}

fn parse<Sink: DimacsSink, Header: DimacsHeader>(
    source: impl Read,
    sink_constructor_args: Sink::ConstructorArgs,
) -> Result<Sink::Formula, MalformedInputError> {
    let mut reader = BufReader::new(source);
    let mut parser = DimacsParser::<Sink, Header>::new(sink_constructor_args);

    loop {
        let num_bytes = {
            let data = reader.fill_buf()?;

            if data.is_empty() {
                return parser.complete();
            }

            parser.parse_chunk(data)?;
            data.len()
        };

        reader.consume(num_bytes);
    }
}

/// The core parser. Both formats share the tokenisation; the `Header` decides which numbers are
/// weights and where a finished clause goes.
struct DimacsParser<Sink: DimacsSink, Header> {
    sink_constructor_args: Option<Sink::ConstructorArgs>,
    sink: Option<Sink>,
    header: Option<Header>,
    buffer: String,
    clause: Vec<NonZeroI32>,
    state: ParseState,
    parsed_clauses: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ParseState {
    StartLine,
    Header,
    Comment,
    Number,
    NegativeNumber,
    Body,
}

impl<Sink: DimacsSink, Header: DimacsHeader> DimacsParser<Sink, Header> {
    fn new(sink_constructor_args: Sink::ConstructorArgs) -> Self {
        DimacsParser {
            sink_constructor_args: Some(sink_constructor_args),
            sink: None,
            header: None,
            buffer: String::new(),
            clause: vec![],
            state: ParseState::StartLine,
            parsed_clauses: 0,
        }
    }

    /// Parse the next chunk of bytes. This may start in the middle of a number or the header, and
    /// may end in such a state as well.
    fn parse_chunk(&mut self, chunk: &[u8]) -> Result<(), MalformedInputError> {
        for &byte in chunk {
            match self.state {
                ParseState::StartLine => match byte {
                    b if b.is_ascii_whitespace() => {}

                    b'p' => {
                        self.state = ParseState::Header;
                        self.buffer.clear();
                        self.buffer.push('p');
                    }

                    b'c' => self.state = ParseState::Comment,

                    b'0'..=b'9' => self.start_number(byte),
                    b'-' => self.start_number(byte),

                    b => return Err(MalformedInputError::UnexpectedCharacter(b as char)),
                },

                ParseState::Header => match byte {
                    b'\n' => {
                        self.init_formula()?;
                        self.state = ParseState::StartLine;
                    }

                    b => self.buffer.push(b as char),
                },

                ParseState::Comment => {
                    if byte == b'\n' {
                        self.state = ParseState::StartLine;
                    }
                }

                ParseState::Number => match byte {
                    b'0'..=b'9' => self.buffer.push(byte as char),

                    b if b.is_ascii_whitespace() => {
                        self.finish_number()?;

                        // A new line may start with a comment, even in the middle of a clause.
                        self.state = if b == b'\n' {
                            ParseState::StartLine
                        } else {
                            ParseState::Body
                        };
                    }

                    b => return Err(MalformedInputError::UnexpectedCharacter(b as char)),
                },

                ParseState::NegativeNumber => match byte {
                    b'1'..=b'9' => {
                        self.buffer.push(byte as char);
                        self.state = ParseState::Number;
                    }

                    b => return Err(MalformedInputError::UnexpectedCharacter(b as char)),
                },

                ParseState::Body => match byte {
                    b'\n' => self.state = ParseState::StartLine,
                    b if b.is_ascii_whitespace() => {}

                    b'0'..=b'9' => self.start_number(byte),
                    b'-' => self.start_number(byte),

                    b => return Err(MalformedInputError::UnexpectedCharacter(b as char)),
                },
            }
        }

        Ok(())
    }

    fn start_number(&mut self, first_byte: u8) {
        self.state = if first_byte == b'-' {
            ParseState::NegativeNumber
        } else {
            ParseState::Number
        };

        self.buffer.clear();
        self.buffer.push(first_byte as char);
    }

    fn complete(mut self) -> Result<Sink::Formula, MalformedInputError> {
        // The source does not have to end with a new line.
        match self.state {
            ParseState::Header => self.init_formula()?,
            ParseState::Number => self.finish_number()?,
            ParseState::NegativeNumber => return Err(MalformedInputError::UnterminatedClause),
            ParseState::StartLine | ParseState::Comment | ParseState::Body => {}
        }

        let (Some(sink), Some(header)) = (self.sink, self.header) else {
            return Err(MalformedInputError::MissingHeader);
        };

        header.check_weights()?;

        if !self.clause.is_empty() || header.has_pending_clause() {
            Err(MalformedInputError::UnterminatedClause)
        } else if header.num_clauses() != self.parsed_clauses {
            Err(MalformedInputError::IncorrectClauseCount {
                expected: header.num_clauses(),
                parsed: self.parsed_clauses,
            })
        } else {
            Ok(sink.into_formula())
        }
    }

    fn init_formula(&mut self) -> Result<(), MalformedInputError> {
        let header = self.buffer.trim().parse::<Header>()?;

        self.sink = Some(Sink::empty(
            self.sink_constructor_args
                .take()
                .ok_or(MalformedInputError::DuplicateHeader)?,
            header.num_variables(),
        ));

        self.header = Some(header);

        Ok(())
    }

    fn finish_number(&mut self) -> Result<(), MalformedInputError> {
        let number = self
            .buffer
            .parse::<i64>()
            .map_err(|_| MalformedInputError::InvalidNumber(self.buffer.clone()))?;

        let header = self
            .header
            .as_mut()
            .ok_or(MalformedInputError::MissingHeader)?;

        if header.accept_weight(number, self.clause.is_empty())? {
            return Ok(());
        }

        if number == 0 {
            return self.finish_clause();
        }

        let num_variables = header.num_variables();
        let literal = i32::try_from(number)
            .ok()
            .filter(|code| code.unsigned_abs() as usize <= num_variables)
            .and_then(NonZeroI32::new)
            .ok_or(MalformedInputError::LiteralOutOfRange {
                literal: number,
                num_variables,
            })?;

        self.clause.push(literal);

        Ok(())
    }

    fn finish_clause(&mut self) -> Result<(), MalformedInputError> {
        let (Some(sink), Some(header)) = (self.sink.as_mut(), self.header.as_mut()) else {
            return Err(MalformedInputError::MissingHeader);
        };

        header.finish_clause(sink, &self.clause, self.parsed_clauses)?;
        self.parsed_clauses += 1;
        self.clause.clear();

        Ok(())
    }
}

/// The format-specific part of the parser.
trait DimacsHeader: FromStr<Err = MalformedInputError> {
    fn num_variables(&self) -> usize;

    fn num_clauses(&self) -> usize;

    /// Offer a number to the header before it is read as a literal. Returns `true` when the
    /// number was consumed as a weight.
    fn accept_weight(
        &mut self,
        number: i64,
        clause_is_empty: bool,
    ) -> Result<bool, MalformedInputError>;

    /// Hand the terminated clause with the given 0-based position in the file to the sink.
    fn finish_clause<Sink: DimacsSink>(
        &mut self,
        sink: &mut Sink,
        clause: &[NonZeroI32],
        index: usize,
    ) -> Result<(), MalformedInputError>;

    /// Whether a clause was started without being terminated.
    fn has_pending_clause(&self) -> bool;

    /// Check that every announced weight was read.
    fn check_weights(&self) -> Result<(), MalformedInputError>;
}

struct PmsHeader {
    num_variables: usize,
    num_hard_clauses: usize,
    num_soft_clauses: usize,
    num_clauses: usize,
    weights: Vec<Weight>,
}

impl FromStr for PmsHeader {
    type Err = MalformedInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut components = s.split_whitespace();

        if components.next() != Some("p") || components.next().is_none() {
            return Err(MalformedInputError::InvalidHeader(s.to_owned()));
        }

        let num_variables = next_num_variables(&mut components, s)?;
        let num_hard_clauses = next_header_component::<usize>(&mut components, s)?;
        let num_soft_clauses = next_header_component::<usize>(&mut components, s)?;
        let num_clauses = num_hard_clauses
            .checked_add(num_soft_clauses)
            .ok_or_else(|| MalformedInputError::InvalidHeader(s.to_owned()))?;

        if components.next().is_some() {
            return Err(MalformedInputError::InvalidHeader(s.to_owned()));
        }

        // Weights are collected as they are read; the announced count is not trusted for
        // allocation.
        Ok(Self {
            num_variables,
            num_hard_clauses,
            num_soft_clauses,
            num_clauses,
            weights: vec![],
        })
    }
}

impl DimacsHeader for PmsHeader {
    fn num_variables(&self) -> usize {
        self.num_variables
    }

    fn num_clauses(&self) -> usize {
        self.num_clauses
    }

    fn accept_weight(&mut self, number: i64, _: bool) -> Result<bool, MalformedInputError> {
        // All weights precede the first clause.
        if self.weights.len() == self.num_soft_clauses {
            return Ok(false);
        }

        self.weights.push(parse_weight(number)?);
        Ok(true)
    }

    fn finish_clause<Sink: DimacsSink>(
        &mut self,
        sink: &mut Sink,
        clause: &[NonZeroI32],
        index: usize,
    ) -> Result<(), MalformedInputError> {
        if index < self.num_hard_clauses {
            sink.add_hard_clause(clause);
            return Ok(());
        }

        let weight = self.weights.get(index - self.num_hard_clauses).ok_or(
            MalformedInputError::IncorrectClauseCount {
                expected: self.num_clauses(),
                parsed: index + 1,
            },
        )?;

        sink.add_soft_clause(clause, *weight)?;
        Ok(())
    }

    fn has_pending_clause(&self) -> bool {
        false
    }

    fn check_weights(&self) -> Result<(), MalformedInputError> {
        if self.weights.len() == self.num_soft_clauses {
            Ok(())
        } else {
            Err(MalformedInputError::MissingWeights {
                expected: self.num_soft_clauses,
                parsed: self.weights.len(),
            })
        }
    }
}

struct WcnfHeader {
    num_variables: usize,
    num_clauses: usize,
    top_weight: Weight,
    pending_weight: Option<Weight>,
}

impl FromStr for WcnfHeader {
    type Err = MalformedInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.starts_with("p wcnf ") {
            return Err(MalformedInputError::InvalidHeader(s.to_owned()));
        }

        let mut components = s.split_whitespace().skip(2);

        let num_variables = next_num_variables(&mut components, s)?;
        let num_clauses = next_header_component::<usize>(&mut components, s)?;
        let top_weight = next_header_component::<Weight>(&mut components, s)?;

        if components.next().is_some() {
            return Err(MalformedInputError::InvalidHeader(s.to_owned()));
        }

        Ok(Self {
            num_variables,
            num_clauses,
            top_weight,
            pending_weight: None,
        })
    }
}

impl DimacsHeader for WcnfHeader {
    fn num_variables(&self) -> usize {
        self.num_variables
    }

    fn num_clauses(&self) -> usize {
        self.num_clauses
    }

    fn accept_weight(
        &mut self,
        number: i64,
        clause_is_empty: bool,
    ) -> Result<bool, MalformedInputError> {
        // Every clause starts with its weight.
        if !clause_is_empty || self.pending_weight.is_some() {
            return Ok(false);
        }

        self.pending_weight = Some(parse_weight(number)?);
        Ok(true)
    }

    fn finish_clause<Sink: DimacsSink>(
        &mut self,
        sink: &mut Sink,
        clause: &[NonZeroI32],
        index: usize,
    ) -> Result<(), MalformedInputError> {
        let weight = self
            .pending_weight
            .take()
            .ok_or(MalformedInputError::MissingWeights {
                expected: self.num_clauses,
                parsed: index,
            })?;

        if weight >= self.top_weight {
            sink.add_hard_clause(clause);
        } else {
            sink.add_soft_clause(clause, weight)?;
        }

        Ok(())
    }

    fn has_pending_clause(&self) -> bool {
        self.pending_weight.is_some()
    }

    fn check_weights(&self) -> Result<(), MalformedInputError> {
        Ok(())
    }
}

fn parse_weight(number: i64) -> Result<Weight, MalformedInputError> {
    Weight::try_from(number).map_err(|_| MalformedInputError::InvalidWeight(number))
}

fn next_header_component<'a, Num: FromStr>(
    components: &mut impl Iterator<Item = &'a str>,
    header: &str,
) -> Result<Num, MalformedInputError> {
    components
        .next()
        .ok_or_else(|| MalformedInputError::InvalidHeader(header.to_owned()))?
        .parse::<Num>()
        .map_err(|_| MalformedInputError::InvalidHeader(header.to_owned()))
}

/// Read the variable count of a header. Literals are `i32`, so no literal can refer to a variable
/// beyond `i32::MAX`.
fn next_num_variables<'a>(
    components: &mut impl Iterator<Item = &'a str>,
    header: &str,
) -> Result<usize, MalformedInputError> {
    let num_variables = next_header_component::<usize>(components, header)?;

    if num_variables > i32::MAX as usize {
        return Err(MalformedInputError::InvalidHeader(header.to_owned()));
    }

    Ok(num_variables)
}

impl DimacsSink for Formula {
    type ConstructorArgs = ();

    type Formula = Formula;

    fn empty(_: Self::ConstructorArgs, num_variables: usize) -> Self {
        Formula::initialize(num_variables)
    }

    fn add_hard_clause(&mut self, clause: &[NonZeroI32]) {
        self.push_hard_clause(clause.iter().map(|&code| Literal::from_dimacs(code)));
    }

    fn add_soft_clause(
        &mut self,
        clause: &[NonZeroI32],
        weight: Weight,
    ) -> Result<(), WeightOverflow> {
        self.push_soft_clause(clause.iter().map(|&code| Literal::from_dimacs(code)), weight)
    }

    fn into_formula(self) -> Self::Formula {
        self
    }
}
