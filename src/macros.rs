pub use enclose::*;

/// Builds an infallible accessor [`Watch`](crate::Watch), cloning the
/// listed captures into the closure.
///
/// ```ignore
/// let rows = watch!([Event::Add, Event::Remove] (store) props: PageProps => store.page(props.page));
/// ```
#[macro_export]
macro_rules! watch {
    ([ $($ev:expr),* $(,)? ] ( $($d_tt:tt)* ) $props:ident : $ty:ty => $($b:tt)*) => {
        $crate::Watch::select(
            $crate::Events::empty() $( | $crate::Events::from($ev) )*,
            $crate::macros::enclose!(($( $d_tt )*) move |$props: &$ty| -> ::std::option::Option<$crate::Target> { $($b)* }),
        )
    };
    ([ $($ev:expr),* $(,)? ] $props:ident : $ty:ty => $($b:tt)*) => {
        $crate::Watch::select(
            $crate::Events::empty() $( | $crate::Events::from($ev) )*,
            move |$props: &$ty| -> ::std::option::Option<$crate::Target> { $($b)* },
        )
    };
}
