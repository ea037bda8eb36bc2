pub mod fixtures;

#[cfg(test)]
mod classroom_tests;
#[cfg(test)]
mod roster_tests;
