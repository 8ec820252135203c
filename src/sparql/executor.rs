//! SPARQL query executor
//!
//! Evaluates the conjunctive fragment of SPARQL against an [`RdfStore`]:
//! basic graph patterns, joins, projection, DISTINCT/REDUCED, LIMIT/OFFSET,
//! variable BINDs and COUNT aggregates. Anything else is reported as
//! unsupported rather than silently evaluated wrong.

use super::results::{QuerySolution, SparqlResults};
use crate::rdf::{xsd_integer, Literal, RdfStore, RdfTerm, TriplePattern};
use rustc_hash::FxHashSet;
use spargebra::algebra::{AggregateExpression, AggregateFunction, Expression, GraphPattern};
use spargebra::term::{NamedNodePattern, TermPattern, TriplePattern as PatternTriple};
use spargebra::Query;
use thiserror::Error;

/// Execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// Query uses a feature this executor does not evaluate
    #[error("Unsupported feature: {0}")]
    Unsupported(String),
}

/// SPARQL query executor
pub struct SparqlExecutor<'a> {
    store: &'a RdfStore,
}

/// A triple pattern position after applying the current solution
enum Slot {
    Bound(RdfTerm),
    Free(String),
}

impl Slot {
    fn variable(name: String, solution: &QuerySolution) -> Self {
        match solution.get(&name) {
            Some(term) => Slot::Bound(term.clone()),
            None => Slot::Free(name),
        }
    }

    fn from_term(term: &TermPattern, solution: &QuerySolution) -> Result<Self, ExecutionError> {
        #[allow(unreachable_patterns)]
        match term {
            TermPattern::NamedNode(n) => Ok(Slot::Bound(RdfTerm::NamedNode(n.clone().into()))),
            TermPattern::Literal(l) => Ok(Slot::Bound(RdfTerm::Literal(l.clone().into()))),
            // Blank nodes in a pattern behave as non-projectable variables
            TermPattern::BlankNode(b) => Ok(Slot::variable(format!("_:{}", b.as_str()), solution)),
            TermPattern::Variable(v) => Ok(Slot::variable(v.as_str().to_string(), solution)),
            _ => Err(ExecutionError::Unsupported("quoted triple patterns".to_string())),
        }
    }

    fn from_predicate(predicate: &NamedNodePattern, solution: &QuerySolution) -> Self {
        match predicate {
            NamedNodePattern::NamedNode(n) => Slot::Bound(RdfTerm::NamedNode(n.clone().into())),
            NamedNodePattern::Variable(v) => Slot::variable(v.as_str().to_string(), solution),
        }
    }

    fn bound(&self) -> Option<&RdfTerm> {
        match self {
            Slot::Bound(term) => Some(term),
            Slot::Free(_) => None,
        }
    }

    /// Bind a free slot; returns false when a repeated variable disagrees
    fn bind(&self, solution: &mut QuerySolution, term: RdfTerm) -> bool {
        match self {
            Slot::Bound(_) => true,
            Slot::Free(var) => match solution.get(var) {
                Some(existing) => existing == &term,
                None => {
                    solution.bind(var.clone(), term);
                    true
                }
            },
        }
    }
}

impl<'a> SparqlExecutor<'a> {
    /// Create a new executor
    pub fn new(store: &'a RdfStore) -> Self {
        Self { store }
    }

    /// Execute a parsed query
    pub fn execute(&self, query: &Query) -> Result<SparqlResults, ExecutionError> {
        match query {
            Query::Select { pattern, .. } => self.execute_select(pattern),
            Query::Ask { pattern, .. } => self.execute_ask(pattern).map(SparqlResults::Boolean),
            Query::Construct { .. } => {
                Err(ExecutionError::Unsupported("CONSTRUCT queries".to_string()))
            }
            Query::Describe { .. } => {
                Err(ExecutionError::Unsupported("DESCRIBE queries".to_string()))
            }
        }
    }

    /// Execute a SELECT query
    pub fn execute_select(&self, pattern: &GraphPattern) -> Result<SparqlResults, ExecutionError> {
        let solutions = self.evaluate(pattern)?;
        let variables = projected_variables(pattern).unwrap_or_else(|| {
            let mut vars: Vec<String> = solutions
                .iter()
                .flat_map(|s| s.bindings.keys())
                .filter(|v| !v.starts_with("_:"))
                .cloned()
                .collect::<FxHashSet<_>>()
                .into_iter()
                .collect();
            vars.sort();
            vars
        });

        Ok(SparqlResults::Bindings {
            variables,
            solutions,
        })
    }

    /// Execute an ASK query
    pub fn execute_ask(&self, pattern: &GraphPattern) -> Result<bool, ExecutionError> {
        Ok(!self.evaluate(pattern)?.is_empty())
    }

    fn evaluate(&self, pattern: &GraphPattern) -> Result<Vec<QuerySolution>, ExecutionError> {
        match pattern {
            GraphPattern::Bgp { patterns } => self.evaluate_bgp(patterns),
            GraphPattern::Join { left, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                let mut joined = Vec::new();
                for l in &left {
                    for r in &right {
                        if l.is_compatible(r) {
                            joined.push(l.merge(r));
                        }
                    }
                }
                Ok(joined)
            }
            GraphPattern::Project { inner, variables } => {
                let variables: Vec<String> =
                    variables.iter().map(|v| v.as_str().to_string()).collect();
                Ok(self
                    .evaluate(inner)?
                    .iter()
                    .map(|s| s.project(&variables))
                    .collect())
            }
            GraphPattern::Distinct { inner } => {
                let mut unique: Vec<QuerySolution> = Vec::new();
                for solution in self.evaluate(inner)? {
                    if !unique.contains(&solution) {
                        unique.push(solution);
                    }
                }
                Ok(unique)
            }
            GraphPattern::Reduced { inner } => self.evaluate(inner),
            GraphPattern::Slice {
                inner,
                start,
                length,
            } => Ok(self
                .evaluate(inner)?
                .into_iter()
                .skip(*start)
                .take(length.unwrap_or(usize::MAX))
                .collect()),
            GraphPattern::Extend {
                inner,
                variable,
                expression,
            } => {
                let mut solutions = self.evaluate(inner)?;
                for solution in &mut solutions {
                    let value = match expression {
                        Expression::Variable(source) => solution.get(source.as_str()).cloned(),
                        Expression::NamedNode(n) => Some(RdfTerm::NamedNode(n.clone().into())),
                        Expression::Literal(l) => Some(RdfTerm::Literal(l.clone().into())),
                        other => {
                            return Err(ExecutionError::Unsupported(format!(
                                "BIND expression {:?}",
                                other
                            )))
                        }
                    };
                    if let Some(value) = value {
                        solution.bind(variable.as_str(), value);
                    }
                }
                Ok(solutions)
            }
            GraphPattern::Group {
                inner,
                variables,
                aggregates,
            } => {
                let rows = self.evaluate(inner)?;
                let keys: Vec<String> = variables.iter().map(|v| v.as_str().to_string()).collect();

                let mut groups: Vec<(QuerySolution, Vec<QuerySolution>)> = Vec::new();
                if keys.is_empty() {
                    // Implicit single group, present even over zero rows
                    groups.push((QuerySolution::new(), rows));
                } else {
                    for row in rows {
                        let key = row.project(&keys);
                        match groups.iter_mut().find(|(k, _)| *k == key) {
                            Some((_, members)) => members.push(row),
                            None => groups.push((key, vec![row])),
                        }
                    }
                }

                let mut out = Vec::with_capacity(groups.len());
                for (mut key, members) in groups {
                    for (variable, aggregate) in aggregates {
                        let count = count_aggregate(aggregate, &members)?;
                        key.bind(
                            variable.as_str(),
                            RdfTerm::Literal(Literal::new_typed_literal(
                                count.to_string(),
                                xsd_integer(),
                            )),
                        );
                    }
                    out.push(key);
                }
                Ok(out)
            }
            other => Err(ExecutionError::Unsupported(format!("graph pattern {:?}", other))),
        }
    }

    fn evaluate_bgp(&self, patterns: &[PatternTriple]) -> Result<Vec<QuerySolution>, ExecutionError> {
        let mut solutions = vec![QuerySolution::new()];
        for pattern in patterns {
            let mut next = Vec::new();
            for solution in &solutions {
                next.extend(self.match_pattern(pattern, solution)?);
            }
            solutions = next;
            if solutions.is_empty() {
                break;
            }
        }
        Ok(solutions)
    }

    fn match_pattern(
        &self,
        pattern: &PatternTriple,
        solution: &QuerySolution,
    ) -> Result<Vec<QuerySolution>, ExecutionError> {
        let subject = Slot::from_term(&pattern.subject, solution)?;
        let predicate = Slot::from_predicate(&pattern.predicate, solution);
        let object = Slot::from_term(&pattern.object, solution)?;

        // A bound term that cannot occupy its position matches nothing
        let lookup_subject = match subject.bound() {
            Some(term) => match term.to_subject() {
                Some(s) => Some(s),
                None => return Ok(Vec::new()),
            },
            None => None,
        };
        let lookup_predicate = match predicate.bound() {
            Some(term) => match term.to_predicate() {
                Some(p) => Some(p),
                None => return Ok(Vec::new()),
            },
            None => None,
        };
        let lookup_object = object.bound().cloned().map(Into::into);

        let lookup = TriplePattern::new(lookup_subject, lookup_predicate, lookup_object);
        let mut matches = Vec::new();
        for triple in self.store.matching(&lookup) {
            let mut extended = solution.clone();
            if subject.bind(&mut extended, triple.subject.into())
                && predicate.bind(&mut extended, triple.predicate.into())
                && object.bind(&mut extended, triple.object.into())
            {
                matches.push(extended);
            }
        }
        Ok(matches)
    }
}

fn count_aggregate(
    aggregate: &AggregateExpression,
    members: &[QuerySolution],
) -> Result<usize, ExecutionError> {
    match aggregate {
        AggregateExpression::CountSolutions { distinct } => {
            if *distinct {
                let mut unique: Vec<&QuerySolution> = Vec::new();
                for member in members {
                    if !unique.contains(&member) {
                        unique.push(member);
                    }
                }
                Ok(unique.len())
            } else {
                Ok(members.len())
            }
        }
        AggregateExpression::FunctionCall {
            name: AggregateFunction::Count,
            expr,
            distinct,
        } => {
            let Expression::Variable(variable) = expr else {
                return Err(ExecutionError::Unsupported(
                    "COUNT over expressions".to_string(),
                ));
            };
            let values = members.iter().filter_map(|m| m.get(variable.as_str()));
            if *distinct {
                Ok(values.collect::<FxHashSet<_>>().len())
            } else {
                Ok(values.count())
            }
        }
        other => Err(ExecutionError::Unsupported(format!("aggregate {:?}", other))),
    }
}

fn projected_variables(pattern: &GraphPattern) -> Option<Vec<String>> {
    match pattern {
        GraphPattern::Project { variables, .. } => {
            Some(variables.iter().map(|v| v.as_str().to_string()).collect())
        }
        GraphPattern::Slice { inner, .. }
        | GraphPattern::Distinct { inner }
        | GraphPattern::Reduced { inner } => projected_variables(inner),
        _ => None,
    }
}
