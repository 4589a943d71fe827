pub(crate) mod deque;
