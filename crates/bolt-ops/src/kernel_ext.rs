use bolt_kernel::{Kernel, KernelIntrospect, ThreadQuery};

/// Everything an operation needs from the host on one object: mutation,
/// read-only introspection, and the thread table.
///
/// Lets a wrapper hold `&mut` for the kernel call and hand out `&` views
/// for selection and diffing afterwards.
pub trait KernelBundle: Kernel + KernelIntrospect + ThreadQuery {
    fn as_introspect(&self) -> &dyn KernelIntrospect;
    fn as_thread_query(&self) -> &dyn ThreadQuery;
}

impl<T: Kernel + KernelIntrospect + ThreadQuery> KernelBundle for T {
    fn as_introspect(&self) -> &dyn KernelIntrospect {
        self
    }

    fn as_thread_query(&self) -> &dyn ThreadQuery {
        self
    }
}
