//! Rank-1 constraint systems over the BN254 scalar field.
//!
//! Circuits are synthesized into an `ark-relations` constraint system; once
//! synthesis is done its matrices are frozen into an [`R1cs`] together with
//! the namespace ranges recorded along the way. A constraint is
//! `<A, z> * <B, z> = <C, z>` where `z = (1, public..., private...)`.

use std::iter;

use ark_ff::{One, Zero};
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use curve::BaseField;
use thiserror::Error;

use crate::error::{CircuitError, CircuitResult};

/// One sparse matrix row: `(coefficient, column of z)` pairs.
pub type Row = Vec<(BaseField, usize)>;

/// Namespace paths recorded against constraint indices during synthesis.
///
/// `ark-relations` namespaces only carry static names and need a tracing
/// layer to be reported, so paths such as `slot3/subgroup` are tracked here
/// by the constraint count at which they open and close.
#[derive(Clone, Debug, Default)]
pub(crate) struct Scopes {
    path: Vec<String>,
    marks: Vec<(usize, String)>,
}

impl Scopes {
    /// Runs `f` with `name` appended to the current path.
    pub(crate) fn scoped<T, F>(
        &mut self,
        cs: &ConstraintSystemRef<BaseField>,
        name: &str,
        f: F,
    ) -> Result<T, SynthesisError>
    where
        F: FnOnce(&mut Self) -> Result<T, SynthesisError>,
    {
        self.path.push(name.to_string());
        self.mark(cs);
        let out = f(self);
        self.path.pop();
        self.mark(cs);
        out
    }

    fn mark(&mut self, cs: &ConstraintSystemRef<BaseField>) {
        let start = cs.num_constraints();
        let name = self.path.join("/");
        match self.marks.last_mut() {
            Some(last) if last.0 == start => last.1 = name,
            _ => self.marks.push((start, name)),
        }
    }
}

/// Values for every public and private variable.
#[derive(Clone, Debug, Default, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Assignment {
    pub public: Vec<BaseField>,
    pub private: Vec<BaseField>,
}

impl Assignment {
    /// The assignment a prove-mode synthesis left in `cs`, without the
    /// leading constant one.
    pub(crate) fn from_constraint_system(cs: &ConstraintSystemRef<BaseField>) -> CircuitResult<Self> {
        let inner = cs
            .borrow()
            .ok_or_else(|| CircuitError::Configuration("constraint system is gone".into()))?;
        Ok(Self {
            public: inner.instance_assignment.iter().skip(1).copied().collect(),
            private: inner.witness_assignment.clone(),
        })
    }

    pub fn to_bytes(&self) -> CircuitResult<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.compressed_size());
        self.serialize_compressed(&mut bytes)
            .map_err(|e| CircuitError::Serialization(e.to_string()))?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> CircuitResult<Self> {
        Self::deserialize_compressed(bytes).map_err(|e| CircuitError::Serialization(e.to_string()))
    }
}

/// Why an assignment fails to satisfy a constraint system.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConstraintViolation {
    #[error("expected {expected} {kind} values, found {found}")]
    Shape {
        kind: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("constraint {index} references a variable outside the assignment")]
    Unbound { index: usize },
    #[error("constraint {index} in `{namespace}` is not satisfied")]
    Unsatisfied { index: usize, namespace: String },
}

/// A compiled constraint system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct R1cs {
    num_public: usize,
    num_private: usize,
    a: Vec<Row>,
    b: Vec<Row>,
    c: Vec<Row>,
    /// `(first constraint index, namespace path)`, ordered by index.
    namespaces: Vec<(usize, String)>,
}

impl R1cs {
    /// Inlines every pending linear combination of `cs` and takes its matrices.
    pub(crate) fn from_constraint_system(
        cs: &ConstraintSystemRef<BaseField>,
        scopes: Scopes,
    ) -> CircuitResult<Self> {
        cs.finalize();
        let matrices = cs
            .to_matrices()
            .ok_or_else(|| CircuitError::Configuration("constraint system has no matrices".into()))?;
        Ok(Self {
            num_public: matrices.num_instance_variables.saturating_sub(1),
            num_private: matrices.num_witness_variables,
            a: matrices.a,
            b: matrices.b,
            c: matrices.c,
            namespaces: scopes.marks,
        })
    }

    pub fn num_public(&self) -> usize {
        self.num_public
    }

    pub fn num_private(&self) -> usize {
        self.num_private
    }

    pub fn num_constraints(&self) -> usize {
        self.a.len()
    }

    /// The `(A, B, C)` rows of constraint `index`.
    pub fn constraint(&self, index: usize) -> Option<(&Row, &Row, &Row)> {
        Some((self.a.get(index)?, self.b.get(index)?, self.c.get(index)?))
    }

    /// Namespace path that was active when constraint `index` was added.
    pub fn namespace_of(&self, index: usize) -> &str {
        let end = self.namespaces.partition_point(|(start, _)| *start <= index);
        match end.checked_sub(1) {
            Some(i) => self.namespaces[i].1.as_str(),
            None => "",
        }
    }

    /// Checks that the three matrices agree in height and every column
    /// stays within `z`.
    pub fn check_well_formed(&self) -> CircuitResult<()> {
        if self.b.len() != self.a.len() || self.c.len() != self.a.len() {
            return Err(CircuitError::Configuration(
                "constraint matrices differ in height".into(),
            ));
        }
        let width = 1 + self.num_public + self.num_private;
        for (index, ((a, b), c)) in self.a.iter().zip(&self.b).zip(&self.c).enumerate() {
            let undeclared = [a, b, c]
                .iter()
                .any(|row| row.iter().any(|&(_, column)| column >= width));
            if undeclared {
                return Err(CircuitError::Configuration(format!(
                    "constraint {index} references an undeclared variable"
                )));
            }
        }
        Ok(())
    }

    /// Returns the first violated constraint, if any.
    pub fn is_satisfied(&self, assignment: &Assignment) -> Result<(), ConstraintViolation> {
        if assignment.public.len() != self.num_public {
            return Err(ConstraintViolation::Shape {
                kind: "public",
                expected: self.num_public,
                found: assignment.public.len(),
            });
        }
        if assignment.private.len() != self.num_private {
            return Err(ConstraintViolation::Shape {
                kind: "private",
                expected: self.num_private,
                found: assignment.private.len(),
            });
        }

        let z: Vec<BaseField> = iter::once(BaseField::one())
            .chain(assignment.public.iter().copied())
            .chain(assignment.private.iter().copied())
            .collect();

        for (index, ((a, b), c)) in self.a.iter().zip(&self.b).zip(&self.c).enumerate() {
            let eval = |row: &Row| evaluate(row, &z).ok_or(ConstraintViolation::Unbound { index });
            if eval(a)? * eval(b)? != eval(c)? {
                return Err(ConstraintViolation::Unsatisfied {
                    index,
                    namespace: self.namespace_of(index).to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> CircuitResult<Vec<u8>> {
        let encoded = EncodedR1cs::from(self);
        let mut bytes = Vec::with_capacity(encoded.compressed_size());
        encoded
            .serialize_compressed(&mut bytes)
            .map_err(|e| CircuitError::Serialization(e.to_string()))?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> CircuitResult<Self> {
        let encoded = EncodedR1cs::deserialize_compressed(bytes)
            .map_err(|e| CircuitError::Serialization(e.to_string()))?;
        let r1cs = Self::try_from(encoded)?;
        r1cs.check_well_formed()?;
        Ok(r1cs)
    }
}

fn evaluate(row: &[(BaseField, usize)], z: &[BaseField]) -> Option<BaseField> {
    row.iter().try_fold(BaseField::zero(), |acc, &(coeff, column)| {
        z.get(column).map(|value| acc + coeff * value)
    })
}

/// Flat canonical encoding of one matrix.
#[derive(CanonicalSerialize, CanonicalDeserialize)]
struct EncodedMatrix {
    row_lengths: Vec<u64>,
    coefficients: Vec<BaseField>,
    columns: Vec<u64>,
}

impl EncodedMatrix {
    fn encode(rows: &[Row]) -> Self {
        let mut out = Self {
            row_lengths: Vec::with_capacity(rows.len()),
            coefficients: Vec::new(),
            columns: Vec::new(),
        };
        for row in rows {
            out.row_lengths.push(row.len() as u64);
            for &(coeff, column) in row {
                out.coefficients.push(coeff);
                out.columns.push(column as u64);
            }
        }
        out
    }

    fn decode(self) -> CircuitResult<Vec<Row>> {
        if self.coefficients.len() != self.columns.len() {
            return Err(CircuitError::Serialization(
                "matrix coefficients and columns differ in length".into(),
            ));
        }
        let mut entries = self.coefficients.into_iter().zip(self.columns);
        let mut rows = Vec::with_capacity(self.row_lengths.len());
        for len in self.row_lengths {
            let row: Row = entries
                .by_ref()
                .take(len as usize)
                .map(|(coeff, column)| (coeff, column as usize))
                .collect();
            if row.len() as u64 != len {
                return Err(CircuitError::Serialization("matrix row is truncated".into()));
            }
            rows.push(row);
        }
        if entries.next().is_some() {
            return Err(CircuitError::Serialization("matrix has trailing entries".into()));
        }
        Ok(rows)
    }
}

#[derive(CanonicalSerialize, CanonicalDeserialize)]
struct EncodedR1cs {
    num_public: u64,
    num_private: u64,
    a: EncodedMatrix,
    b: EncodedMatrix,
    c: EncodedMatrix,
    namespace_starts: Vec<u64>,
    namespace_names: Vec<Vec<u8>>,
}

impl From<&R1cs> for EncodedR1cs {
    fn from(r1cs: &R1cs) -> Self {
        Self {
            num_public: r1cs.num_public as u64,
            num_private: r1cs.num_private as u64,
            a: EncodedMatrix::encode(&r1cs.a),
            b: EncodedMatrix::encode(&r1cs.b),
            c: EncodedMatrix::encode(&r1cs.c),
            namespace_starts: r1cs.namespaces.iter().map(|(start, _)| *start as u64).collect(),
            namespace_names: r1cs
                .namespaces
                .iter()
                .map(|(_, name)| name.as_bytes().to_vec())
                .collect(),
        }
    }
}

impl TryFrom<EncodedR1cs> for R1cs {
    type Error = CircuitError;

    fn try_from(encoded: EncodedR1cs) -> CircuitResult<Self> {
        if encoded.namespace_starts.len() != encoded.namespace_names.len() {
            return Err(CircuitError::Serialization(
                "namespace starts and names differ in length".into(),
            ));
        }
        let namespaces = encoded
            .namespace_starts
            .into_iter()
            .zip(encoded.namespace_names)
            .map(|(start, name)| {
                String::from_utf8(name)
                    .map(|name| (start as usize, name))
                    .map_err(|e| CircuitError::Serialization(e.to_string()))
            })
            .collect::<CircuitResult<Vec<_>>>()?;
        Ok(Self {
            num_public: encoded.num_public as usize,
            num_private: encoded.num_private as usize,
            a: encoded.a.decode()?,
            b: encoded.b.decode()?,
            c: encoded.c.decode()?,
            namespaces,
        })
    }
}
