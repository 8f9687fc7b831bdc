// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

pub mod alt;
pub mod log;
pub mod lexer;
pub mod parser;
pub mod sym_table;
pub mod vectree;

/// ID of a terminal
pub type TokenId = u16;
/// ID of a nonterminal
pub type VarId = u16;
/// ID of a rule alternative. We use the same type as [VarId] because they're very similar quantities.
pub type AltId = VarId;

pub trait CollectJoin {
    fn join(&mut self, separator: &str) -> String
        where Self: Iterator,
              <Self as Iterator>::Item: ToString
    {
        self.map(|x| x.to_string()).collect::<Vec<_>>().join(separator)
    }

    fn to_vec(self) -> Vec<<Self as Iterator>::Item>
        where Self: Iterator + Sized
    {
        self.collect::<Vec<_>>()
    }
}

impl<I: Iterator> CollectJoin for I {}

// ---------------------------------------------------------------------------------------------
// Macros

pub mod macros {
    /// Generates a `Symbol` instance.
    ///
    /// # Examples
    /// ```
    /// # use ciut_core::{TokenId, VarId, sym};
    /// # use ciut_core::parser::Symbol;
    /// assert_eq!(sym!(t 2), Symbol::T(2 as TokenId));
    /// assert_eq!(sym!(nt 3), Symbol::NT(3 as VarId));
    /// assert_eq!(sym!(e), Symbol::Empty);
    /// assert_eq!(sym!(end), Symbol::End);
    /// ```
    #[macro_export]
    macro_rules! sym {
        (t $id:expr) => { $crate::parser::Symbol::T($id as $crate::TokenId) };
        (nt $id:expr) => { $crate::parser::Symbol::NT($id as $crate::VarId) };
        (e) => { $crate::parser::Symbol::Empty };
        (end) => { $crate::parser::Symbol::End };
    }

    /// Generates an alternative: a string of symbols separated by a comma.
    ///
    /// # Example
    /// ```
    /// # use ciut_core::{TokenId, VarId, alt, sym};
    /// # use ciut_core::alt::Alternative;
    /// # use ciut_core::parser::Symbol;
    /// assert_eq!(alt!(nt 1, t 2, e), Alternative::new(vec![sym!(nt 1), sym!(t 2), sym!(e)]));
    /// ```
    #[macro_export]
    macro_rules! alt {
        () => { $crate::alt::Alternative::new(std::vec![]) };
        ($($a:ident $($b:expr)?,)+) => { $crate::alt![$($a $($b)?),+] };
        ($($a:ident $($b:expr)?),*) => { $crate::alt::Alternative::new(std::vec![$($crate::sym!($a $($b)?)),*]) };
    }

    /// Generates the code to initialize a [HashMap](std::collections::HashMap).
    ///
    /// # Example
    /// ```
    /// # use ciut_core::hashmap;
    /// let h = hashmap!(1 => "one", 2 => "two");
    /// assert_eq!(h.get(&2), Some(&"two"));
    /// ```
    #[macro_export]
    macro_rules! hashmap {
        () => { std::collections::HashMap::new() };
        ($($key:expr => $value:expr,)+) => { $crate::hashmap!($($key => $value),+) };
        ($($key:expr => $value:expr),*) => {
            std::collections::HashMap::from([ $(($key, $value),)* ])
        };
    }

    /// Generates the code to initialize a [HashSet](std::collections::HashSet).
    ///
    /// # Example
    /// ```
    /// # use ciut_core::hashset;
    /// let s = hashset!['a', 'b'];
    /// assert!(s.contains(&'b'));
    /// ```
    #[macro_export]
    macro_rules! hashset {
        () => { std::collections::HashSet::new() };
        ($($key:expr,)+) => { $crate::hashset!($($key),+) };
        ($($key:expr),*) => { std::collections::HashSet::from([ $($key,)* ]) };
    }
}
