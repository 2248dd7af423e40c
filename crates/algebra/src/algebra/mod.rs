mod coalgebra;

pub use coalgebra::CoAlgebra;
