//! `define_port_error!` declares a port's error enum with `thiserror`
//! messages and one snake_case constructor per variant.
//!
//! Constructor parameters are `impl Into<T>` for each field type, so string
//! fields take `&str` directly.

macro_rules! define_port_error {
    (
        $(#[$enum_attr:meta])*
        pub enum $name:ident {
            $(
                $(#[$attr:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $display:expr
            ),* $(,)?
        }
    ) => {
        $(#[$enum_attr])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$attr])*
                #[error($display)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@constructor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };

    (@constructor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@constructor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@fields $variant [] [] $( $field : $ty, )*);
    };

    // Fold each field into a parameter list and a struct initialiser.
    (@fields $variant:ident [$($args:tt)*] [$($body:tt)*] $field:ident : $ty:ty, $($tail:tt)*) => {
        define_port_error!(
            @fields $variant
            [$($args)* $field: impl Into<$ty>,]
            [$($body)* $field: $field.into(),]
            $($tail)*
        );
    };

    (@fields $variant:ident [$($args:tt)*] [$($body:tt)*]) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($args)*) -> Self {
                Self::$variant { $($body)* }
            }
        }
    };
}

pub(crate) use define_port_error;
